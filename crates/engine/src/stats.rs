//! Monthly aggregation: totals plus the expense breakdown by category.

use std::collections::HashMap;

use crate::{
    Money, Transaction, TransactionKind,
    categories::{UNCATEGORIZED_COLOR, UNCATEGORIZED_NAME},
};

/// Expense total of one category bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Money,
    pub color: String,
}

impl CategoryTotal {
    /// Share of `total` in percent (0 when `total` is not positive).
    #[must_use]
    pub fn share_of(&self, total: Money) -> f64 {
        if !total.is_positive() {
            return 0.0;
        }
        self.value.as_major_f64() / total.as_major_f64() * 100.0
    }
}

/// Derived summary of a period. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
    /// Sorted by value descending; ties keep encounter order.
    pub by_category: Vec<CategoryTotal>,
}

impl Summary {
    /// `[("Income", income), ("Expense", expense)]`, the cash-flow series.
    #[must_use]
    pub fn cash_flow(&self) -> [(&'static str, Money); 2] {
        [("Income", self.income), ("Expense", self.expense)]
    }

    /// Accumulated spend of a category bucket, zero when absent.
    #[must_use]
    pub fn spend_for(&self, name: &str) -> Money {
        self.by_category
            .iter()
            .find(|total| total.name == name)
            .map_or(Money::ZERO, |total| total.value)
    }
}

/// Aggregates a period's transactions in a single pass.
///
/// Income adds to `income`; every other transaction adds to `expense` and
/// to the bucket of its category name, or to `Uncategorized` when no
/// category was joined.
#[must_use]
pub fn aggregate(transactions: &[Transaction]) -> Summary {
    let mut income = Money::ZERO;
    let mut expense = Money::ZERO;
    let mut buckets: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in transactions {
        if tx.kind == TransactionKind::Income {
            income += tx.amount;
            continue;
        }

        expense += tx.amount;
        let (name, color) = match &tx.category {
            Some(category) => (category.name.as_str(), category.color.as_str()),
            None => (UNCATEGORIZED_NAME, UNCATEGORIZED_COLOR),
        };
        match index.get(name) {
            Some(&at) => buckets[at].value += tx.amount,
            None => {
                index.insert(name.to_string(), buckets.len());
                buckets.push(CategoryTotal {
                    name: name.to_string(),
                    value: tx.amount,
                    color: color.to_string(),
                });
            }
        }
    }

    // `sort_by` is stable: equal values keep encounter order.
    buckets.sort_by(|a, b| b.value.cmp(&a.value));

    Summary {
        income,
        expense,
        balance: income - expense,
        by_category: buckets,
    }
}
