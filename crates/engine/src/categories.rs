//! User-defined expense categories.

use api_types::category::CategoryRow;
use uuid::Uuid;

use crate::Money;

/// Color used when a category has none.
pub const DEFAULT_COLOR: &str = "#3b82f6";
/// Display color for a category row without a stored color.
pub const FALLBACK_COLOR: &str = "#e5e7eb";
/// Bucket name for expenses without a category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
/// Neutral color of the uncategorized bucket.
pub const UNCATEGORIZED_COLOR: &str = "#9ca3af";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    /// Monthly spend limit; `None` means unlimited.
    pub monthly_budget: Option<Money>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        let budget = Money::from_stored(&row.monthly_budget);
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            color: row.color.unwrap_or_else(|| FALLBACK_COLOR.to_string()),
            monthly_budget: budget.is_positive().then_some(budget),
        }
    }
}

/// Input for a new category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryNew {
    pub name: String,
    pub color: String,
    pub monthly_budget: Option<Money>,
}

impl CategoryNew {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: DEFAULT_COLOR.to_string(),
            monthly_budget: None,
        }
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    #[must_use]
    pub fn monthly_budget(mut self, limit: Money) -> Self {
        self.monthly_budget = Some(limit);
        self
    }
}

/// Partial update of a category. `monthly_budget: Some(None)` removes the
/// limit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub monthly_budget: Option<Option<Money>>,
}
