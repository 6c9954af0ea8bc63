use engine::{BudgetProgress, Currency, Money, TransactionKind};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::LineGauge,
};

use crate::ui::theme::Theme;

fn sign_color(amount: Money, theme: &Theme) -> Color {
    if amount.is_positive() {
        theme.positive
    } else if amount.is_negative() {
        theme.negative
    } else {
        theme.text
    }
}

/// Signed amount: `+Rp 1.000` in green, `-Rp 300` in red.
#[must_use]
pub fn styled_amount(amount: Money, currency: Currency, theme: &Theme) -> Span<'static> {
    let prefix = if amount.is_positive() { "+" } else { "" };
    Span::styled(
        format!("{prefix}{}", amount.format(currency)),
        Style::default().fg(sign_color(amount, theme)),
    )
}

/// Unsigned amount colored by the transaction type.
#[must_use]
pub fn styled_kind_amount(
    amount: Money,
    kind: TransactionKind,
    currency: Currency,
    theme: &Theme,
) -> Span<'static> {
    let color = match kind {
        TransactionKind::Income => theme.positive,
        TransactionKind::Expense => theme.negative,
    };
    Span::styled(amount.format(currency), Style::default().fg(color))
}

/// Balance-style amount: bold, colored by sign, no `+`.
#[must_use]
pub fn styled_total(amount: Money, currency: Currency, theme: &Theme) -> Span<'static> {
    Span::styled(
        amount.format(currency),
        Style::default()
            .fg(sign_color(amount, theme))
            .add_modifier(Modifier::BOLD),
    )
}

/// Green below 70 %, warning up to 90 %, red above.
#[must_use]
pub fn budget_color(progress: &BudgetProgress, theme: &Theme) -> Color {
    match progress.ratio() {
        None => theme.dim,
        Some(_) if progress.over_budget => theme.negative,
        Some(ratio) if ratio < 0.7 => theme.positive,
        Some(ratio) if ratio < 0.9 => theme.warning,
        Some(_) => theme.negative,
    }
}

/// `None` for unlimited categories.
#[must_use]
pub fn budget_gauge(progress: &BudgetProgress, theme: &Theme) -> Option<LineGauge<'static>> {
    let ratio = progress.ratio()?;
    Some(
        LineGauge::default()
            .filled_style(Style::default().fg(budget_color(progress, theme)))
            .unfilled_style(Style::default().fg(theme.border))
            .ratio(ratio),
    )
}

/// `████████░░ 80%`, or a dotted line when the category has no budget.
#[must_use]
pub fn inline_progress_bar(progress: &BudgetProgress, width: usize) -> String {
    match (progress.ratio(), progress.percent_u16()) {
        (Some(ratio), Some(percent)) => {
            let filled = ((ratio * width as f64).round() as usize).min(width);
            let empty = width.saturating_sub(filled);
            format!("{}{} {percent:>3}%", "█".repeat(filled), "░".repeat(empty))
        }
        _ => format!("{} ----", "·".repeat(width)),
    }
}

#[must_use]
pub fn styled_progress_bar(progress: &BudgetProgress, width: usize, theme: &Theme) -> Span<'static> {
    Span::styled(
        inline_progress_bar(progress, width),
        Style::default().fg(budget_color(progress, theme)),
    )
}
