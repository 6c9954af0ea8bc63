//! CSV export of a period's transactions.
//!
//! The layout is fixed: `Date,Category,Type,Amount,Description`, one line per
//! transaction, lines separated by `\n` without a trailing newline. Only the
//! description is quoted (internal quotes doubled); other fields are written
//! verbatim and embedded newlines are not escaped.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{EngineError, Period, ResultEngine, Transaction};

pub const HEADER: [&str; 5] = ["Date", "Category", "Type", "Amount", "Description"];

/// Download name for a period, `transactions-<yyyy>-<MM>.csv`.
#[must_use]
pub fn file_name(period: Period) -> String {
    format!("transactions-{}.csv", period.key())
}

pub fn transactions_csv(transactions: &[Transaction]) -> ResultEngine<String> {
    if transactions.is_empty() {
        return Err(EngineError::NothingToExport);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(HEADER).map_err(export_error)?;
    for tx in transactions {
        let date = tx.date.format("%Y-%m-%d").to_string();
        let amount = tx.amount.to_plain_string();
        let description = quote(tx.description.as_deref().unwrap_or(""));
        writer
            .write_record([
                date.as_str(),
                tx.category_name(),
                tx.kind.as_str(),
                amount.as_str(),
                description.as_str(),
            ])
            .map_err(export_error)?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))?;
    let mut text = String::from_utf8(data).map_err(|err| EngineError::Export(err.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn export_error(err: csv::Error) -> EngineError {
    tracing::error!("failed to serialize export row: {err}");
    EngineError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::{CategoryRef, Money, TransactionKind};

    fn tx(description: Option<&str>, category: Option<&str>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            amount: Money::new(1_250_050),
            kind: TransactionKind::Expense,
            category_id: None,
            category: category.map(|name| CategoryRef {
                id: Uuid::new_v4(),
                name: name.to_string(),
                color: "#ef4444".to_string(),
            }),
            description: description.map(ToString::to_string),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        }
    }

    #[test]
    fn quotes_are_doubled_inside_description() {
        let csv = transactions_csv(&[tx(Some("He said \"hi\""), Some("Food"))]).unwrap();
        assert_eq!(
            csv,
            "Date,Category,Type,Amount,Description\n\
             2024-03-09,Food,expense,12500.50,\"He said \"\"hi\"\"\""
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let csv = transactions_csv(&[tx(None, None), tx(Some("bus"), Some("Transport"))]).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-03-09,Uncategorized,expense,12500.50,\"\"");
        assert_eq!(lines[2], "2024-03-09,Transport,expense,12500.50,\"bus\"");
    }

    #[test]
    fn other_fields_are_not_escaped() {
        let csv = transactions_csv(&[tx(Some("line\nbreak"), Some("Food, drinks"))]).unwrap();
        assert!(csv.contains(",Food, drinks,"));
        assert!(csv.ends_with("\"line\nbreak\""));
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(transactions_csv(&[]), Err(EngineError::NothingToExport));
    }

    #[test]
    fn file_name_uses_month_key() {
        let period = Period::new(2024, 3).unwrap();
        assert_eq!(file_name(period), "transactions-2024-03.csv");
    }
}
