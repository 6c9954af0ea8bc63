use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, centered_rect},
        theme::Theme,
    },
};

/// Full-screen stop shown while the backend cannot be configured.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = centered_rect(72, 12, area);
    let inner = Card::new("configuration error", theme)
        .focused(true)
        .render_frame(frame, card_area);

    let message = state
        .fatal
        .as_deref()
        .unwrap_or("The backend is not configured.");
    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Set supabase_url and supabase_anon_key in config/pennywise.toml,",
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            "or export PENNYWISE_SUPABASE_URL and PENNYWISE_SUPABASE_ANON_KEY.",
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            "Use backend = \"memory\" to try the app without a server.",
            Style::default().fg(theme.dim),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::raw(" reload configuration   "),
            Span::styled("q", Style::default().fg(theme.accent)),
            Span::raw(" quit"),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
