//! The remote data capability the engine runs on.
//!
//! Everything persistent lives in a hosted backend that exposes table-scoped
//! `select`/`insert`/`update`/`delete` plus the identity of the signed-in
//! user. Row-level authorization is the backend's job: a client only ever
//! sees the rows of its own user.

use api_types::auth::{AuthSession, AuthUser, PasswordCredentials};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// A table row as returned by the backend.
pub type Row = serde_json::Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Categories,
    Transactions,
}

impl Table {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Transactions => "transactions",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// A related resource joined into each row under the related table's name,
/// e.g. `categories(id, name, color)` through `category_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Embed {
    pub table: Table,
    pub foreign_key: String,
    pub columns: Vec<String>,
}

/// Select parameters: projection, joins, predicates, ordering and limit.
///
/// `columns: None` selects every column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub columns: Option<Vec<String>>,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn embed(mut self, table: Table, foreign_key: &str, columns: &[&str]) -> Self {
        self.embeds.push(Embed {
            table,
            foreign_key: foreign_key.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
        });
        self
    }

    #[must_use]
    pub fn filter(mut self, column: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: false,
        });
        self
    }

    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Failures reported by a [`DataClient`] or an [`Authenticator`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Permission denied")]
    Forbidden,
    #[error("Not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Server unreachable: {0}")]
    Transport(String),
}

/// Table API of the hosted backend.
#[async_trait]
pub trait DataClient: Send + Sync {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, BackendError>;

    /// Inserts one row and returns it as stored.
    async fn insert(&self, table: Table, row: Row) -> Result<Row, BackendError>;

    /// Applies `patch` to the row with `id` and returns it as stored.
    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, BackendError>;

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), BackendError>;

    /// The signed-in user, `None` without a valid session.
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError>;
}

/// Session lifecycle of the hosted backend.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<AuthSession, BackendError>;

    /// Registers a user. Returns `None` when the backend requires an email
    /// confirmation before the first sign-in.
    async fn sign_up(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<Option<AuthSession>, BackendError>;

    async fn sign_out(&mut self) -> Result<(), BackendError>;

    /// Reuses a session obtained earlier (e.g. persisted on disk).
    fn restore(&mut self, session: AuthSession);

    fn session(&self) -> Option<&AuthSession>;
}

/// Serializes a payload into a row.
pub(crate) fn to_row<T: Serialize>(value: &T) -> Result<Row, BackendError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BackendError::Validation(
            "payload is not an object".to_string(),
        )),
        Err(err) => Err(BackendError::Validation(err.to_string())),
    }
}

/// Deserializes a row returned by the backend.
pub(crate) fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, BackendError> {
    serde_json::from_value(Value::Object(row))
        .map_err(|err| BackendError::Server(format!("malformed row: {err}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_builder_collects_clauses() {
        let query = Query::all()
            .embed(Table::Categories, "category_id", &["id", "name"])
            .filter("transaction_date", FilterOp::Gte, "2024-03-01")
            .order_desc("transaction_date")
            .limit(5);

        assert_eq!(query.embeds[0].table, Table::Categories);
        assert_eq!(query.filters[0].value, json!("2024-03-01"));
        assert_eq!(
            query.order,
            Some(Order {
                column: "transaction_date".to_string(),
                descending: true
            })
        );
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn from_row_reports_malformed_rows() {
        let mut row = Row::new();
        row.insert("id".to_string(), json!("not-a-uuid"));
        let err = from_row::<api_types::auth::AuthUser>(row).unwrap_err();
        assert!(matches!(err, BackendError::Server(_)));
    }
}
