use engine::{BudgetProgress, Category, Currency, Money, Summary};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{
        AppState,
        forms::{CategoryField, CategoryForm},
    },
    ui::{
        components::{
            card::Card,
            modal::{form_row, render_modal},
            money::{budget_gauge, styled_progress_bar},
            truncate,
        },
        theme::{Theme, hex_color},
    },
};

/// This month's spend of `category` against its limit.
fn progress(category: &Category, summary: Option<&Summary>) -> BudgetProgress {
    let spend = summary.map_or(Money::ZERO, |summary| summary.spend_for(&category.name));
    BudgetProgress::new(spend, category.monthly_budget)
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area);

    render_header(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
    render_selected(frame, layout[2], state, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![
        Span::styled("Spend in ", Style::default().fg(theme.dim)),
        Span::styled(
            state.period.label(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {} categories", state.categories.items.len()),
            Style::default().fg(theme.dim),
        ),
    ];
    if let Some(err) = &state.categories.error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(err.clone(), Style::default().fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn budget_label(category: &Category, currency: Currency) -> String {
    category
        .monthly_budget
        .map_or_else(|| "No limit".to_string(), |limit| limit.format(currency))
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Categories", theme).focused(true);
    let list = &state.categories;

    if list.items.is_empty() {
        let inner = card.render_frame(frame, area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("No categories yet. Press "),
                Span::styled("n", Style::default().fg(theme.accent)),
                Span::raw(" to create one."),
            ]))
            .style(Style::default().fg(theme.dim))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let items = list
        .items
        .iter()
        .map(|category| {
            let progress = progress(category, list.summary.as_ref());
            let mut spans = vec![
                Span::styled("■ ", Style::default().fg(hex_color(&category.color))),
                Span::styled(
                    format!("{:<18}", truncate(&category.name, 17)),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!("{:>14}", progress.spend.format(state.currency)),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(" / ", Style::default().fg(theme.dim)),
                Span::styled(
                    format!("{:<14}", budget_label(category, state.currency)),
                    Style::default().fg(theme.text_muted),
                ),
                styled_progress_bar(&progress, 12, theme),
            ];
            if progress.over_budget {
                spans.push(Span::styled(
                    format!("  over by {}", progress.overage.format(state.currency)),
                    Style::default().fg(theme.negative),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(list.selected));

    let widget = List::new(items)
        .block(card.block())
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");

    frame.render_stateful_widget(widget, area, &mut list_state);
}

/// Gauge of the highlighted category.
fn render_selected(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(category) = state.categories.current() else {
        return;
    };
    let inner = Card::new(&category.name, theme).render_frame(frame, area);
    let progress = progress(category, state.categories.summary.as_ref());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    match budget_gauge(&progress, theme) {
        Some(gauge) => {
            let label = match progress.percent_u16() {
                Some(percent) => {
                    format!("{percent}% of {}", budget_label(category, state.currency))
                }
                None => String::new(),
            };
            frame.render_widget(gauge.label(label), rows[0]);
        }
        None => frame.render_widget(
            Paragraph::new(Span::styled(
                "No monthly budget",
                Style::default().fg(theme.dim),
            )),
            rows[0],
        ),
    }

    let detail = if progress.over_budget {
        Span::styled(
            format!("Over budget by {}", progress.overage.format(state.currency)),
            Style::default().fg(theme.negative),
        )
    } else {
        Span::styled(
            format!("Spent {}", progress.spend.format(state.currency)),
            Style::default().fg(theme.text_muted),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(detail)), rows[1]);
}

pub fn render_form(frame: &mut Frame<'_>, area: Rect, form: &CategoryForm, theme: &Theme) {
    let title = if form.editing.is_some() {
        "Edit category"
    } else {
        "New category"
    };
    let inner = render_modal(frame, area, title, (56, 10), theme);

    let mut color_row = form_row(
        "Color",
        &form.color,
        form.focus == CategoryField::Color,
        true,
        theme,
    );
    color_row.spans.push(Span::styled(
        "  ■■",
        Style::default().fg(hex_color(&form.color)),
    ));

    let mut lines = vec![
        form_row(
            "Name",
            &form.name,
            form.focus == CategoryField::Name,
            false,
            theme,
        ),
        color_row,
        form_row(
            "Budget",
            &form.budget,
            form.focus == CategoryField::Budget,
            false,
            theme,
        ),
        Line::from(""),
    ];

    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.error),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Leave the budget blank for no monthly limit",
            Style::default().fg(theme.dim),
        ))),
    }
    lines.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(theme.accent)),
        Span::raw(" next  "),
        Span::styled("←/→", Style::default().fg(theme.accent)),
        Span::raw(" color  "),
        Span::styled("Enter", Style::default().fg(theme.accent)),
        Span::raw(" save  "),
        Span::styled("Esc", Style::default().fg(theme.accent)),
        Span::raw(" cancel"),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
