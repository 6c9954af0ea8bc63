use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
};

/// Display name: the local part of the email.
fn username(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let inner = Card::new("Profile", theme).render_frame(frame, layout[0]);

    let email = state
        .user
        .as_ref()
        .and_then(|user| user.email.as_deref())
        .unwrap_or("-");
    let user_id = state
        .user
        .as_ref()
        .map_or_else(|| "-".to_string(), |user| user.id.to_string());

    let label =
        |text: &'static str| Span::styled(format!("{text:<10}"), Style::default().fg(theme.dim));
    let lines = vec![
        Line::from(Span::styled(
            username(email).to_string(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![label("Email"), Span::raw(email.to_string())]),
        Line::from(vec![label("User id"), Span::raw(user_id)]),
        Line::from(vec![
            label("Currency"),
            Span::raw(state.currency.code().to_string()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_the_local_part() {
        assert_eq!(username("alice@example.com"), "alice");
        assert_eq!(username("bob"), "bob");
        assert_eq!(username("-"), "-");
    }
}
