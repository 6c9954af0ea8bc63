use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use engine::Money;

use crate::{
    app::{
        AppState,
        forms::{TransactionField, TransactionForm},
    },
    ui::{
        components::{
            card::Card,
            modal::{form_row, render_modal},
            money::{styled_amount, styled_kind_amount},
            truncate,
        },
        theme::{Theme, hex_color},
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let list = &state.transactions;
    let net = list
        .items
        .iter()
        .map(|tx| tx.signed_amount())
        .sum::<Money>();

    let mut spans = vec![
        Span::styled("◀ [ ", Style::default().fg(theme.accent)),
        Span::styled(
            state.period.label(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ] ▶   ", Style::default().fg(theme.accent)),
        Span::styled(
            format!("{} transactions  net ", list.items.len()),
            Style::default().fg(theme.dim),
        ),
        styled_amount(net, state.currency, theme),
    ];
    if let Some(err) = &list.error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(err.clone(), Style::default().fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Transactions", theme).focused(true);
    let list = &state.transactions;

    if list.items.is_empty() {
        let inner = card.render_frame(frame, area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("No transactions this month. Press "),
                Span::styled("n", Style::default().fg(theme.accent)),
                Span::raw(" to add one."),
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
        .map(|tx| {
            let category_color = tx
                .category
                .as_ref()
                .map_or(theme.dim, |category| hex_color(&category.color));
            ListItem::new(Line::from(vec![
                Span::styled(
                    tx.date.format("%Y-%m-%d  ").to_string(),
                    Style::default().fg(theme.dim),
                ),
                Span::styled("■ ", Style::default().fg(category_color)),
                Span::styled(
                    format!("{:<16}", truncate(tx.category_name(), 15)),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(
                    format!(
                        "{:<28}",
                        truncate(tx.description.as_deref().unwrap_or("-"), 27)
                    ),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!("{:<9}", tx.kind.label()),
                    Style::default().fg(theme.dim),
                ),
                styled_amount(tx.signed_amount(), state.currency, theme),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(list.selected));

    let widget = List::new(items)
        .block(card.block())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(widget, area, &mut list_state);
}

/// Add/edit modal, drawn over the current section.
pub fn render_form(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &TransactionForm,
    state: &AppState,
    theme: &Theme,
) {
    let title = if form.editing.is_some() {
        "Edit transaction"
    } else {
        "New transaction"
    };
    let inner = render_modal(frame, area, title, (60, 12), theme);
    let categories = &state.categories.items;

    let row = |label: &str, value: &str, field: TransactionField, choice: bool| {
        form_row(label, value, form.focus == field, choice, theme)
    };

    let amount_preview = form
        .to_new()
        .map(|input| styled_kind_amount(input.amount, input.kind, state.currency, theme))
        .unwrap_or_else(|_| Span::raw(""));

    let mut amount_row = row("Amount", &form.amount, TransactionField::Amount, false);
    amount_row.spans.push(Span::raw("  "));
    amount_row.spans.push(amount_preview);

    let mut lines = vec![
        amount_row,
        row("Type", form.kind.label(), TransactionField::Kind, true),
        row(
            "Category",
            form.category_label(categories),
            TransactionField::Category,
            true,
        ),
        row(
            "Description",
            &form.description,
            TransactionField::Description,
            false,
        ),
        row("Date", &form.date, TransactionField::Date, false),
        Line::from(""),
    ];

    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.error),
        ))),
        None => lines.push(Line::from(Span::styled(
            "YYYY-MM-DD dates, blank category means uncategorized",
            Style::default().fg(theme.dim),
        ))),
    }
    lines.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(theme.accent)),
        Span::raw(" next  "),
        Span::styled("←/→", Style::default().fg(theme.accent)),
        Span::raw(" choose  "),
        Span::styled("Enter", Style::default().fg(theme.accent)),
        Span::raw(" save  "),
        Span::styled("Esc", Style::default().fg(theme.accent)),
        Span::raw(" cancel"),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
