//! Transaction primitives.
//!
//! A `Transaction` is a single dated income or expense. Amounts are always
//! non-negative; the `kind` alone decides whether it credits or debits.

use api_types::transaction::{CategoryEmbed, TransactionRow, TransactionType};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    Money,
    categories::{FALLBACK_COLOR, UNCATEGORIZED_NAME},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

impl From<&str> for TransactionKind {
    /// Anything that is not `income` debits.
    fn from(value: &str) -> Self {
        if value == "income" {
            Self::Income
        } else {
            Self::Expense
        }
    }
}

impl From<TransactionKind> for TransactionType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => TransactionType::Income,
            TransactionKind::Expense => TransactionType::Expense,
        }
    }
}

/// The category joined into a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

impl From<CategoryEmbed> for CategoryRef {
    fn from(embed: CategoryEmbed) -> Self {
        Self {
            id: embed.id,
            name: embed.name,
            color: embed.color.unwrap_or_else(|| FALLBACK_COLOR.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Money,
    pub kind: TransactionKind,
    pub category_id: Option<Uuid>,
    /// Joined category; `None` when there is no reference or the referenced
    /// record was not returned.
    pub category: Option<CategoryRef>,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl Transaction {
    /// Amount with the sign of its effect on the balance.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Joined category name, or the uncategorized bucket.
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map_or(UNCATEGORIZED_NAME, |category| category.name.as_str())
    }

    /// Display title: description, then category name, then `Untitled`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.description
            .as_deref()
            .or(self.category.as_ref().map(|c| c.name.as_str()))
            .unwrap_or("Untitled")
    }
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            amount: Money::from_stored(&row.amount),
            kind: TransactionKind::from(row.kind.as_str()),
            category_id: row.category_id,
            category: row.categories.map(CategoryRef::from),
            description: row.description,
            date: row.transaction_date,
        }
    }
}

/// Input for a new transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionNew {
    pub amount: Money,
    pub kind: TransactionKind,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Partial update of a transaction. Nested options clear the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub amount: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Option<Uuid>>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: serde_json::Value) -> TransactionRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn row_conversion_coerces_amount_and_kind() {
        let tx = Transaction::from(row(json!({
            "id": "9a6d7f51-3c62-4a3f-9d0e-0f4c1a2b3c4d",
            "user_id": "0b5c9c3e-1d2a-4e5f-8a9b-7c6d5e4f3a2b",
            "amount": "oops",
            "type": "refund",
            "category_id": "5f1e2d3c-4b5a-4968-8776-655443322110",
            "transaction_date": "2024-03-09"
        })));

        assert_eq!(tx.amount, Money::ZERO);
        assert_eq!(tx.kind, TransactionKind::Expense);
        // The reference exists but the joined record is missing.
        assert!(tx.category_id.is_some());
        assert_eq!(tx.category_name(), UNCATEGORIZED_NAME);
        assert_eq!(tx.title(), "Untitled");
    }

    #[test]
    fn title_prefers_description_then_category() {
        let mut tx = Transaction::from(row(json!({
            "id": "9a6d7f51-3c62-4a3f-9d0e-0f4c1a2b3c4d",
            "user_id": "0b5c9c3e-1d2a-4e5f-8a9b-7c6d5e4f3a2b",
            "amount": 25000,
            "type": "income",
            "transaction_date": "2024-03-09",
            "categories": { "id": "5f1e2d3c-4b5a-4968-8776-655443322110", "name": "Salary", "color": null }
        })));

        assert_eq!(tx.title(), "Salary");
        assert_eq!(tx.signed_amount(), Money::from_major(25000));
        assert_eq!(tx.category.as_ref().unwrap().color, FALLBACK_COLOR);

        tx.description = Some("March payroll".to_string());
        assert_eq!(tx.title(), "March payroll");
    }
}
