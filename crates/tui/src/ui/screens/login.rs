use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField, LoginMode},
    ui::{components::centered_rect, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let login = &state.login;
    let card_area = centered_rect(44, 9, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" pennywise · {} ", login.mode.title().to_lowercase()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Email
            Constraint::Length(1),
            Constraint::Length(1), // Password
            Constraint::Length(1),
            Constraint::Length(1), // Hints
        ])
        .margin(1)
        .split(inner);

    render_input(
        frame,
        rows[0],
        "email",
        &login.email,
        false,
        login.focus == LoginField::Email,
        theme,
    );
    render_input(
        frame,
        rows[2],
        "password",
        &login.password,
        true,
        login.focus == LoginField::Password,
        theme,
    );

    let switch = match login.mode {
        LoginMode::SignIn => " new account",
        LoginMode::SignUp => " back to sign in",
    };
    let hints = Line::from(vec![
        Span::styled("Enter", Style::default().fg(theme.accent)),
        Span::raw(" submit  "),
        Span::styled("Ctrl+N", Style::default().fg(theme.accent)),
        Span::raw(switch),
    ]);
    frame.render_widget(
        Paragraph::new(hints)
            .style(Style::default().fg(theme.dim))
            .alignment(Alignment::Center),
        rows[4],
    );

    let notice = login
        .message
        .as_deref()
        .map(|message| (message, theme.error))
        .or_else(|| login.info.as_deref().map(|info| (info, theme.positive)));
    if let Some((text, color)) = notice {
        let notice_area = Rect {
            x: card_area.x,
            y: card_area.y + card_area.height + 1,
            width: card_area.width,
            height: 1,
        }
        .intersection(area);
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(color)))
                .alignment(Alignment::Center),
            notice_area,
        );
    }
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_password: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let shown = if is_password {
        mask_password(value)
    } else {
        value.to_string()
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
        Span::styled(format!("{shown}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// One bullet per character.
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_mask_counts_chars() {
        assert_eq!(mask_password(""), "");
        assert_eq!(mask_password("pässword"), "••••••••");
    }
}
