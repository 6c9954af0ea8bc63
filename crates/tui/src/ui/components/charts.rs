use engine::{Money, Summary};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::BarChart,
};

use crate::ui::theme::Theme;

/// Income against expense for the month, in whole currency units.
pub fn render_cash_flow(frame: &mut Frame<'_>, area: Rect, summary: &Summary, theme: &Theme) {
    let data: Vec<(&str, u64)> = summary
        .cash_flow()
        .iter()
        .map(|(label, value)| (*label, major_units(*value)))
        .collect();

    let bar_width = (area.width.saturating_sub(4) / 2).clamp(3, 12);
    let chart = BarChart::default()
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .label_style(Style::default().fg(theme.dim));

    frame.render_widget(chart, area);
}

fn major_units(value: Money) -> u64 {
    u64::try_from(value.minor() / 100).unwrap_or(0)
}

/// `████░░░░` bar of `value / max`, `width` cells wide.
#[must_use]
pub fn ascii_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }

    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_bar_fills_proportionally() {
        assert_eq!(ascii_bar(50.0, 100.0, 10), "█████░░░░░");
        assert_eq!(ascii_bar(150.0, 100.0, 4), "████");
        assert_eq!(ascii_bar(1.0, 0.0, 3), "░░░");
    }

    #[test]
    fn negative_totals_chart_as_zero() {
        assert_eq!(major_units(Money::from_major(12)), 12);
        assert_eq!(major_units(Money::new(-500)), 0);
    }
}
