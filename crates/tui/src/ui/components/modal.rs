use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{components::centered_rect, theme::Theme};

/// Clears a centered box, draws its border and returns the inner area.
pub fn render_modal(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    size: (u16, u16),
    theme: &Theme,
) -> Rect {
    let rect = centered_rect(size.0, size.1, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface_bright));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    inner
}

/// One `label  value` row of a form. The focused row shows a cursor, or
/// arrows for choice fields.
pub fn form_row(
    label: &str,
    value: &str,
    focused: bool,
    choice: bool,
    theme: &Theme,
) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let value = match (focused, choice) {
        (true, true) => format!("◀ {value} ▶"),
        (true, false) => format!("{value}│"),
        (false, _) => value.to_string(),
    };
    Line::from(vec![
        Span::styled(format!("{label:<12}"), label_style),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

pub fn render_alert(frame: &mut Frame<'_>, area: Rect, message: &str, theme: &Theme) {
    let inner = render_modal(frame, area, "Error", (60, 7), theme);
    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.error),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to dismiss",
            Style::default().fg(theme.dim),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, question: &str, theme: &Theme) {
    let inner = render_modal(frame, area, "Confirm", (48, 6), theme);
    let lines = vec![
        Line::from(Span::styled(
            question.to_string(),
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.negative)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" keep"),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focused_rows_show_their_editor() {
        let theme = Theme::default();
        let text = |line: Line<'_>| line.to_string();
        assert_eq!(
            text(form_row("Amount", "12", true, false, &theme)),
            "Amount      12│"
        );
        assert_eq!(
            text(form_row("Type", "Expense", true, true, &theme)),
            "Type        ◀ Expense ▶"
        );
        assert_eq!(
            text(form_row("Type", "Expense", false, true, &theme)),
            "Type        Expense"
        );
    }
}
