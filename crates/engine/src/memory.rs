//! In-process backend with the same contract as the hosted one.
//!
//! Rows are kept as JSON objects per table. Every request is scoped to the
//! signed-in user the way the hosted row-level policies scope it: rows of
//! other users are invisible, writes on behalf of another user are
//! forbidden. Clones share the store but keep their own session, so two
//! clones behave like two devices talking to the same backend.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use api_types::auth::{AuthSession, AuthUser, PasswordCredentials};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{
    Authenticator, BackendError, DataClient, Embed, Filter, FilterOp, Query, Row, Table,
};

const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug)]
struct MemoryUser {
    id: Uuid,
    email: String,
    password: String,
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<MemoryUser>,
    tables: HashMap<Table, Vec<Row>>,
}

impl Store {
    fn rows(&self, table: Table) -> &[Row] {
        self.tables
            .get(&table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn user(&self, id: Uuid) -> Option<&MemoryUser> {
        self.users.iter().find(|user| user.id == id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryClient {
    store: Arc<Mutex<Store>>,
    session: Option<AuthSession>,
}

impl MemoryClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new signed-out client on the same store.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            session: None,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, BackendError> {
        self.store
            .lock()
            .map_err(|_| BackendError::Server("memory store poisoned".to_string()))
    }

    /// The session user, if it still exists in the store.
    fn user_id(&self, store: &Store) -> Option<Uuid> {
        let session = self.session.as_ref()?;
        store.user(session.user.id).map(|user| user.id)
    }

    fn require_user(&self, store: &Store) -> Result<Uuid, BackendError> {
        self.user_id(store).ok_or(BackendError::Unauthorized)
    }

    fn open_session(user: &MemoryUser) -> AuthSession {
        AuthSession {
            access_token: format!("memory-{}", Uuid::new_v4()),
            refresh_token: None,
            user: AuthUser {
                id: user.id,
                email: Some(user.email.clone()),
            },
        }
    }
}

fn owned_by(row: &Row, user_id: Uuid) -> bool {
    row.get("user_id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        == Some(user_id)
}

fn row_id(row: &Row) -> Option<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn passes(row: &Row, filter: &Filter) -> bool {
    let Some(value) = row.get(&filter.column) else {
        return false;
    };
    let ordering = compare(value, &filter.value);
    match filter.op {
        FilterOp::Eq => value == &filter.value || ordering == Some(Ordering::Equal),
        FilterOp::Gt => ordering == Some(Ordering::Greater),
        FilterOp::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        FilterOp::Lt => ordering == Some(Ordering::Less),
        FilterOp::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
    }
}

fn project(row: &Row, columns: Option<&[String]>) -> Row {
    match columns {
        None => row.clone(),
        Some(columns) => columns
            .iter()
            .filter_map(|column| row.get(column).map(|value| (column.clone(), value.clone())))
            .collect(),
    }
}

fn embedded(store: &Store, user_id: Uuid, row: &Row, embed: &Embed) -> Value {
    let Some(target) = row.get(&embed.foreign_key).and_then(Value::as_str) else {
        return Value::Null;
    };
    store
        .rows(embed.table)
        .iter()
        .filter(|related| owned_by(related, user_id))
        .find(|related| related.get("id").and_then(Value::as_str) == Some(target))
        .map_or(Value::Null, |related| {
            Value::Object(project(related, Some(embed.columns.as_slice())))
        })
}

fn name_taken(store: &Store, user_id: Uuid, name: &Value, except: Option<Uuid>) -> bool {
    store.rows(Table::Categories).iter().any(|row| {
        owned_by(row, user_id) && row.get("name") == Some(name) && row_id(row) != except
    })
}

fn unique_violation() -> BackendError {
    BackendError::Conflict(
        "duplicate key value violates unique constraint \"categories_user_id_name_key\""
            .to_string(),
    )
}

#[async_trait]
impl DataClient for MemoryClient {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, BackendError> {
        let store = self.lock()?;
        let Some(user_id) = self.user_id(&store) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&Row> = store
            .rows(table)
            .iter()
            .filter(|row| owned_by(row, user_id))
            .filter(|row| query.filters.iter().all(|filter| passes(row, filter)))
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = match (a.get(&order.column), b.get(&order.column)) {
                    (Some(left), Some(right)) => compare(left, right).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut out = project(row, query.columns.as_deref());
                for embed in &query.embeds {
                    out.insert(
                        embed.table.name().to_string(),
                        embedded(&store, user_id, row, embed),
                    );
                }
                out
            })
            .collect())
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, BackendError> {
        let mut store = self.lock()?;
        let user_id = self.require_user(&store)?;
        if !owned_by(&row, user_id) {
            return Err(BackendError::Forbidden);
        }
        if table == Table::Categories {
            let name = row.get("name").cloned().unwrap_or(Value::Null);
            if name_taken(&store, user_id, &name, None) {
                return Err(unique_violation());
            }
        }

        row.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        row.entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        store.tables.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, BackendError> {
        let mut store = self.lock()?;
        let user_id = self.require_user(&store)?;
        if patch.contains_key("user_id") && !owned_by(&patch, user_id) {
            return Err(BackendError::Forbidden);
        }
        if table == Table::Categories
            && let Some(name) = patch.get("name")
            && name_taken(&store, user_id, name, Some(id))
        {
            return Err(unique_violation());
        }

        let row = store
            .tables
            .get_mut(&table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row_id(row) == Some(id) && owned_by(row, user_id))
            })
            .ok_or(BackendError::NotFound)?;
        for (key, value) in patch {
            if key != "id" {
                row.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    /// Deleting an invisible or missing row is a no-op.
    async fn delete(&self, table: Table, id: Uuid) -> Result<(), BackendError> {
        let mut store = self.lock()?;
        let user_id = self.require_user(&store)?;
        if let Some(rows) = store.tables.get_mut(&table) {
            rows.retain(|row| !(row_id(row) == Some(id) && owned_by(row, user_id)));
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        let store = self.lock()?;
        Ok(self.user_id(&store).and_then(|id| {
            store.user(id).map(|user| AuthUser {
                id: user.id,
                email: Some(user.email.clone()),
            })
        }))
    }
}

#[async_trait]
impl Authenticator for MemoryClient {
    async fn sign_in(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<AuthSession, BackendError> {
        let session = {
            let store = self.lock()?;
            let user = store
                .users
                .iter()
                .find(|user| {
                    user.email.eq_ignore_ascii_case(credentials.email.trim())
                        && user.password == credentials.password
                })
                .ok_or_else(|| BackendError::Validation("Invalid login credentials".to_string()))?;
            Self::open_session(user)
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<Option<AuthSession>, BackendError> {
        let email = credentials.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(BackendError::Validation(
                "Unable to validate email address: invalid format".to_string(),
            ));
        }
        if credentials.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(BackendError::Validation(format!(
                "Password should be at least {MIN_PASSWORD_CHARS} characters."
            )));
        }

        let session = {
            let mut store = self.lock()?;
            if store.users.iter().any(|user| user.email == email) {
                return Err(BackendError::Validation(
                    "User already registered".to_string(),
                ));
            }
            let user = MemoryUser {
                id: Uuid::new_v4(),
                email,
                password: credentials.password.clone(),
            };
            let session = Self::open_session(&user);
            store.users.push(user);
            session
        };
        self.session = Some(session.clone());
        Ok(Some(session))
    }

    async fn sign_out(&mut self) -> Result<(), BackendError> {
        self.session = None;
        Ok(())
    }

    fn restore(&mut self, session: AuthSession) {
        self.session = Some(session);
    }

    fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn credentials(email: &str) -> PasswordCredentials {
        PasswordCredentials {
            email: email.to_string(),
            password: "secret-password".to_string(),
        }
    }

    fn object(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    async fn signed_in(email: &str) -> (MemoryClient, Uuid) {
        let mut client = MemoryClient::new();
        let session = client.sign_up(&credentials(email)).await.unwrap().unwrap();
        (client, session.user.id)
    }

    #[tokio::test]
    async fn rows_of_other_users_are_invisible() {
        let (mut alice, alice_id) = signed_in("alice@example.com").await;
        alice
            .insert(
                Table::Categories,
                object(json!({ "user_id": alice_id.to_string(), "name": "Food" })),
            )
            .await
            .unwrap();

        let mut bob = alice.detached();
        bob.sign_up(&credentials("bob@example.com")).await.unwrap();
        let rows = bob.select(Table::Categories, &Query::all()).await.unwrap();
        assert!(rows.is_empty());

        alice.sign_out().await.unwrap();
        assert!(alice.current_user().await.unwrap().is_none());
        let rows = alice.select(Table::Categories, &Query::all()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn writes_for_another_user_are_forbidden() {
        let (client, _) = signed_in("alice@example.com").await;
        let err = client
            .insert(
                Table::Categories,
                object(json!({ "user_id": Uuid::new_v4().to_string(), "name": "Food" })),
            )
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::Forbidden);
    }

    #[tokio::test]
    async fn category_names_are_unique_per_user() {
        let (client, user_id) = signed_in("alice@example.com").await;
        let row = object(json!({ "user_id": user_id.to_string(), "name": "Food" }));
        client.insert(Table::Categories, row.clone()).await.unwrap();
        let err = client.insert(Table::Categories, row).await.unwrap_err();
        assert!(matches!(err, BackendError::Conflict(_)));
    }

    #[tokio::test]
    async fn select_filters_orders_limits_and_embeds() {
        let (client, user_id) = signed_in("alice@example.com").await;
        let category = client
            .insert(
                Table::Categories,
                object(json!({ "user_id": user_id.to_string(), "name": "Food", "color": "#ef4444" })),
            )
            .await
            .unwrap();
        for (date, category_id) in [
            ("2024-02-29", Value::Null),
            ("2024-03-01", category["id"].clone()),
            ("2024-03-15", Value::Null),
            ("2024-04-01", Value::Null),
        ] {
            client
                .insert(
                    Table::Transactions,
                    object(json!({
                        "user_id": user_id.to_string(),
                        "amount": 100,
                        "type": "expense",
                        "category_id": category_id,
                        "transaction_date": date,
                    })),
                )
                .await
                .unwrap();
        }

        let query = Query::all()
            .embed(Table::Categories, "category_id", &["id", "name", "color"])
            .filter("transaction_date", FilterOp::Gte, "2024-03-01")
            .filter("transaction_date", FilterOp::Lte, "2024-03-31")
            .order_desc("transaction_date");
        let rows = client.select(Table::Transactions, &query).await.unwrap();

        let dates: Vec<_> = rows
            .iter()
            .map(|row| row["transaction_date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2024-03-15", "2024-03-01"]);
        assert_eq!(rows[0]["categories"], Value::Null);
        assert_eq!(rows[1]["categories"]["name"], json!("Food"));
        assert!(rows[1]["categories"].get("user_id").is_none());

        let limited = client
            .select(Table::Transactions, &Query::all().limit(1))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn sign_in_checks_credentials() {
        let (client, user_id) = signed_in("alice@example.com").await;
        let mut other = client.detached();

        let err = other
            .sign_in(&PasswordCredentials {
                email: "alice@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Validation(_)));

        let session = other.sign_in(&credentials("Alice@Example.com")).await.unwrap();
        assert_eq!(session.user.id, user_id);

        let err = other.sign_up(&credentials("alice@example.com")).await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Validation("User already registered".to_string())
        );
    }

    #[tokio::test]
    async fn restored_unknown_session_has_no_user() {
        let mut client = MemoryClient::new();
        client.restore(AuthSession {
            access_token: "stale".to_string(),
            refresh_token: None,
            user: AuthUser {
                id: Uuid::new_v4(),
                email: None,
            },
        });
        assert!(client.current_user().await.unwrap().is_none());
        assert!(client.session().is_some());
    }
}
