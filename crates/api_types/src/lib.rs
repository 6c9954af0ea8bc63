//! Rows and payloads exchanged with the hosted data backend.
//!
//! Table rows mirror the PostgREST JSON shape; auth payloads mirror the
//! GoTrue endpoints. Monetary columns are kept as raw JSON values because the
//! backend may return `numeric` either as a number or as a string.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub mod category {
    use super::*;

    /// A row of the `categories` table.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryRow {
        pub id: Uuid,
        pub user_id: Uuid,
        pub name: String,
        #[serde(default)]
        pub color: Option<String>,
        /// `numeric` column; `null` or `0` means unlimited.
        #[serde(default)]
        pub monthly_budget: Value,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryInsert {
        pub user_id: Uuid,
        pub name: String,
        pub color: String,
        pub monthly_budget: Value,
    }

    /// Partial update. `monthly_budget: Some(Value::Null)` clears the limit.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryPatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub monthly_budget: Option<Value>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Income,
        Expense,
    }

    impl TransactionType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    /// The `categories(id, name, color)` resource embedded in a transaction
    /// select.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryEmbed {
        pub id: Uuid,
        pub name: String,
        #[serde(default)]
        pub color: Option<String>,
    }

    /// A row of the `transactions` table, optionally with its category
    /// embedded.
    ///
    /// `kind` stays a plain string: anything that is not `"income"` is
    /// counted as an expense.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionRow {
        pub id: Uuid,
        pub user_id: Uuid,
        #[serde(default)]
        pub amount: Value,
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default)]
        pub category_id: Option<Uuid>,
        #[serde(default)]
        pub description: Option<String>,
        pub transaction_date: NaiveDate,
        #[serde(default)]
        pub categories: Option<CategoryEmbed>,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionInsert {
        pub user_id: Uuid,
        pub amount: Value,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub category_id: Option<Uuid>,
        pub description: Option<String>,
        pub transaction_date: NaiveDate,
    }

    /// Partial update. `category_id: Some(None)` detaches the category.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionPatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<Value>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<Option<Uuid>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<Option<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transaction_date: Option<NaiveDate>,
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordCredentials {
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AuthUser {
        pub id: Uuid,
        #[serde(default)]
        pub email: Option<String>,
    }

    /// Session returned by the password grant (and by sign-up when email
    /// confirmation is disabled).
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AuthSession {
        pub access_token: String,
        #[serde(default)]
        pub refresh_token: Option<String>,
        pub user: AuthUser,
    }
}

pub mod error {
    use super::*;

    /// Error body of either PostgREST (`message`) or GoTrue (`msg`,
    /// `error_description`, `error`).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub msg: Option<String>,
        #[serde(default)]
        pub error_description: Option<String>,
        #[serde(default)]
        pub error: Option<String>,
    }

    impl ErrorBody {
        /// Most specific message the body carries.
        pub fn into_message(self) -> Option<String> {
            self.message
                .or(self.msg)
                .or(self.error_description)
                .or(self.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{error::ErrorBody, transaction::*};
    use serde_json::json;

    #[test]
    fn transaction_row_accepts_embedded_category_and_string_amount() {
        let row: TransactionRow = serde_json::from_value(json!({
            "id": "9a6d7f51-3c62-4a3f-9d0e-0f4c1a2b3c4d",
            "user_id": "0b5c9c3e-1d2a-4e5f-8a9b-7c6d5e4f3a2b",
            "amount": "125000.00",
            "type": "expense",
            "category_id": "5f1e2d3c-4b5a-4968-8776-655443322110",
            "description": null,
            "transaction_date": "2024-03-09",
            "categories": {
                "id": "5f1e2d3c-4b5a-4968-8776-655443322110",
                "name": "Food",
                "color": "#ef4444"
            }
        }))
        .unwrap();

        assert_eq!(row.kind, "expense");
        assert_eq!(row.amount, json!("125000.00"));
        assert_eq!(row.categories.unwrap().name, "Food");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = TransactionPatch {
            category_id: Some(None),
            kind: Some(TransactionType::Income),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "type": "income", "category_id": null }));
    }

    #[test]
    fn error_body_prefers_postgrest_message() {
        let body: ErrorBody = serde_json::from_value(json!({
            "msg": "gotrue",
            "message": "duplicate key value violates unique constraint"
        }))
        .unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("duplicate key value violates unique constraint")
        );
    }
}
