pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Screen, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        area,
    );

    match state.screen {
        Screen::Fatal => screens::fatal::render(frame, area, state, &theme),
        Screen::Login => screens::login::render(frame, area, state, &theme),
        Screen::Home => render_shell(frame, area, state, &theme),
    }

    if let Some(message) = &state.alert {
        components::modal::render_alert(frame, area, message, &theme);
    }
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_tabs(frame, layout[1], state.section, theme);

    let content = layout[2];
    match state.section {
        Section::Dashboard => screens::dashboard::render(frame, content, state, theme),
        Section::Transactions => screens::transactions::render(frame, content, state, theme),
        Section::Categories => screens::categories::render(frame, content, state, theme),
        Section::Profile => screens::profile::render(frame, content, state, theme),
    }

    render_bottom_bar(frame, layout[3], state, theme);
    render_overlays(frame, area, state, theme);
}

fn render_overlays(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    if let Some(form) = &state.transactions.form {
        screens::transactions::render_form(frame, area, form, state, theme);
    }
    if let Some(form) = &state.categories.form {
        screens::categories::render_form(frame, area, form, theme);
    }
    if state.transactions.confirm_delete.is_some() {
        components::modal::render_confirm(frame, area, "Delete this transaction?", theme);
    }
    if state.categories.confirm_delete.is_some() {
        components::modal::render_confirm(
            frame,
            area,
            "Delete this category? Its transactions become uncategorized.",
            theme,
        );
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let email = state
        .user
        .as_ref()
        .and_then(|user| user.email.as_deref())
        .unwrap_or("-");

    let line = Line::from(vec![
        Span::styled(" pennywise  ", Style::default().fg(theme.accent)),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {email}  ")),
        Span::styled("Month", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.period.label())),
        Span::styled("Currency", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.currency.code())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn hint(key: &'static str, label: &'static str, theme: &Theme) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(theme.accent)),
        Span::raw(label),
    ]
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let separator = || Span::styled("  │  ", Style::default().fg(theme.border));

    let mut parts = if state.modal_open() {
        Vec::new()
    } else {
        let mut parts = components::tabs::tab_shortcuts(theme);
        parts.push(separator());
        parts.extend(hint("[ ]", " month", theme));
        parts
    };

    let context = context_hints(state, theme);
    if !context.is_empty() {
        if !parts.is_empty() {
            parts.push(separator());
        }
        parts.extend(context);
    }

    parts.push(separator());
    let quit = if state.modal_open() { "Ctrl+C" } else { "q" };
    parts.extend(hint(quit, " quit", theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    if state.transactions.confirm_delete.is_some() || state.categories.confirm_delete.is_some() {
        return [hint("y", " confirm  ", theme), hint("n", " cancel", theme)].concat();
    }
    if state.modal_open() {
        return [hint("Enter", " save  ", theme), hint("Esc", " cancel", theme)].concat();
    }

    match state.section {
        Section::Dashboard => [
            hint("n", " add  ", theme),
            hint("r", " refresh", theme),
        ]
        .concat(),
        Section::Transactions => [
            hint("n", " add  ", theme),
            hint("e", " edit  ", theme),
            hint("x", " delete  ", theme),
            hint("s", " export csv  ", theme),
            hint("r", " refresh", theme),
        ]
        .concat(),
        Section::Categories => [
            hint("n", " add  ", theme),
            hint("e", " edit  ", theme),
            hint("x", " delete  ", theme),
            hint("r", " refresh", theme),
        ]
        .concat(),
        Section::Profile => hint("l", " sign out", theme).to_vec(),
    }
}
