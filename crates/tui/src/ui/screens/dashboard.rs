use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use engine::{Currency, Summary, Transaction};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{ascii_bar, render_cash_flow},
            money::{styled_amount, styled_total},
            truncate,
        },
        theme::{Theme, hex_color},
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Month navigation
            Constraint::Length(4), // Totals
            Constraint::Min(6),    // Distribution + cash flow
            Constraint::Length(8), // Recent transactions
        ])
        .split(area);

    render_header(frame, layout[0], state, theme);

    let Some(summary) = &state.dashboard.summary else {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("No data. Press "),
                Span::styled("r", Style::default().fg(theme.accent)),
                Span::raw(" to refresh."),
            ]))
            .alignment(Alignment::Center),
            layout[2],
        );
        return;
    };

    render_totals(frame, layout[1], summary, state.currency, theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[2]);
    render_distribution(frame, middle[0], summary, state.currency, theme);
    let inner = Card::new("Cash flow", theme).render_frame(frame, middle[1]);
    render_cash_flow(frame, inner, summary, theme);

    render_recent(frame, layout[3], &state.dashboard.recent, state.currency, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![
        Span::styled("◀ [ ", Style::default().fg(theme.accent)),
        Span::styled(
            state.period.label(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ] ▶", Style::default().fg(theme.accent)),
    ];
    if let Some(err) = &state.dashboard.error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(err.clone(), Style::default().fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_totals(
    frame: &mut Frame<'_>,
    area: Rect,
    summary: &Summary,
    currency: Currency,
    theme: &Theme,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    StatCard::new("Balance", styled_total(summary.balance, currency, theme), theme)
        .subtitle("income − expenses")
        .render(frame, cols[0]);
    StatCard::new(
        "Income",
        Span::styled(
            summary.income.format(currency),
            Style::default().fg(theme.positive),
        ),
        theme,
    )
    .render(frame, cols[1]);
    StatCard::new(
        "Expenses",
        Span::styled(
            summary.expense.format(currency),
            Style::default().fg(theme.negative),
        ),
        theme,
    )
    .render(frame, cols[2]);
}

fn render_distribution(
    frame: &mut Frame<'_>,
    area: Rect,
    summary: &Summary,
    currency: Currency,
    theme: &Theme,
) {
    let inner = Card::new("Expense distribution", theme).render_frame(frame, area);

    if summary.by_category.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No expenses this month",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let bar_width = usize::from(inner.width.saturating_sub(42)).clamp(4, 24);
    let rows: Vec<Line> = summary
        .by_category
        .iter()
        .take(usize::from(inner.height))
        .map(|total| {
            let color = hex_color(&total.color);
            let share = total.share_of(summary.expense);
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::styled(
                    format!("{:<16}", truncate(&total.name, 15)),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!("{:>14}", total.value.format(currency)),
                    Style::default().fg(theme.negative),
                ),
                Span::raw("  "),
                Span::styled(
                    ascii_bar(share, 100.0, bar_width),
                    Style::default().fg(color),
                ),
                Span::styled(format!(" {share:>5.1}%"), Style::default().fg(theme.dim)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(rows), inner);
}

fn render_recent(
    frame: &mut Frame<'_>,
    area: Rect,
    recent: &[Transaction],
    currency: Currency,
    theme: &Theme,
) {
    let inner = Card::new("Recent transactions", theme).render_frame(frame, area);

    if recent.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("No transactions yet. Press "),
                Span::styled("n", Style::default().fg(theme.accent)),
                Span::raw(" to add one."),
            ]))
            .style(Style::default().fg(theme.dim))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let rows: Vec<Line> = recent
        .iter()
        .map(|tx| {
            let category_color = tx
                .category
                .as_ref()
                .map_or(theme.dim, |category| hex_color(&category.color));
            Line::from(vec![
                Span::styled(
                    tx.date.format("%d %b  ").to_string(),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    format!("{:<24}", truncate(tx.title(), 23)),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!("{:<16}", truncate(tx.category_name(), 15)),
                    Style::default().fg(category_color),
                ),
                styled_amount(tx.signed_amount(), currency, theme),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(rows), inner);
}
