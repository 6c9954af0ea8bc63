//! Remote data client speaking PostgREST (tables) and GoTrue (auth).

use api_types::{
    auth::{AuthSession, AuthUser, PasswordCredentials},
    error::ErrorBody,
};
use async_trait::async_trait;
use engine::{
    EngineError,
    backend::{Authenticator, BackendError, DataClient, Query, Row, Table},
    memory::MemoryClient,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use uuid::Uuid;

/// `select` clause: the projection followed by the embedded resources.
fn select_clause(query: &Query) -> String {
    let mut parts = match &query.columns {
        Some(columns) => columns.clone(),
        None => vec!["*".to_string()],
    };
    for embed in &query.embeds {
        parts.push(format!("{}({})", embed.table.name(), embed.columns.join(",")));
    }
    parts.join(",")
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Query string of a PostgREST select.
fn query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), select_clause(query))];
    for filter in &query.filters {
        pairs.push((
            filter.column.clone(),
            format!("{}.{}", filter.op.as_str(), filter_value(&filter.value)),
        ));
    }
    if let Some(order) = &query.order {
        let direction = if order.descending { "desc" } else { "asc" };
        pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit".to_string(), limit.to_string()));
    }
    pairs
}

fn id_filter(id: Uuid) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

fn status_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| "unknown error".to_string());

    match status.as_u16() {
        401 => BackendError::Unauthorized,
        403 => BackendError::Forbidden,
        404 => BackendError::NotFound,
        409 => BackendError::Conflict(message),
        400 | 422 => BackendError::Validation(message),
        _ => BackendError::Server(message),
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
    session: Option<AuthSession>,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> crate::error::Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|err| {
                EngineError::MissingConfiguration(format!("invalid supabase_url: {err}"))
            })?;
        Ok(Self {
            base_url,
            anon_key: anon_key.trim().to_string(),
            http: reqwest::Client::new(),
            session: None,
        })
    }

    fn bearer(&self) -> &str {
        self.session
            .as_ref()
            .map_or(self.anon_key.as_str(), |session| session.access_token.as_str())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    fn table(&self, method: Method, table: Table) -> RequestBuilder {
        self.request(method, &format!("/rest/v1/{}", table.name()))
    }

    async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        let res = request.send().await.map_err(transport)?;
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        let err = status_error(status, &body);
        tracing::warn!(%status, "backend request failed: {err}");
        Err(err)
    }

    async fn rows(request: RequestBuilder) -> Result<Vec<Row>, BackendError> {
        Self::send(request)
            .await?
            .json::<Vec<Row>>()
            .await
            .map_err(transport)
    }
}

#[async_trait]
impl DataClient for SupabaseClient {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, BackendError> {
        Self::rows(self.table(Method::GET, table).query(&query_pairs(query))).await
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, BackendError> {
        let request = self
            .table(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&row);
        Self::rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Server("insert returned no row".to_string()))
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, BackendError> {
        let request = self
            .table(Method::PATCH, table)
            .query(&id_filter(id))
            .header("Prefer", "return=representation")
            .json(&patch);
        // Rows hidden by row-level policies update nothing.
        Self::rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or(BackendError::NotFound)
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), BackendError> {
        Self::send(self.table(Method::DELETE, table).query(&id_filter(id))).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        if self.session.is_none() {
            return Ok(None);
        }
        match Self::send(self.request(Method::GET, "/auth/v1/user")).await {
            Ok(res) => Ok(Some(res.json::<AuthUser>().await.map_err(transport)?)),
            Err(BackendError::Unauthorized | BackendError::Forbidden) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl Authenticator for SupabaseClient {
    async fn sign_in(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<AuthSession, BackendError> {
        self.session = None;
        let request = self
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(credentials);
        let session = Self::send(request)
            .await?
            .json::<AuthSession>()
            .await
            .map_err(transport)?;
        self.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<Option<AuthSession>, BackendError> {
        self.session = None;
        let request = self
            .request(Method::POST, "/auth/v1/signup")
            .json(credentials);
        let body = Self::send(request)
            .await?
            .json::<Value>()
            .await
            .map_err(transport)?;

        // Without an access token the backend waits for an email confirmation.
        if body.get("access_token").is_none() {
            return Ok(None);
        }
        let session: AuthSession = serde_json::from_value(body)
            .map_err(|err| BackendError::Server(format!("malformed session: {err}")))?;
        self.session = Some(session.clone());
        Ok(Some(session))
    }

    async fn sign_out(&mut self) -> Result<(), BackendError> {
        if self.session.is_none() {
            return Ok(());
        }
        let result = Self::send(self.request(Method::POST, "/auth/v1/logout")).await;
        self.session = None;
        match result {
            Ok(_) | Err(BackendError::Unauthorized) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn restore(&mut self, session: AuthSession) {
        self.session = Some(session);
    }

    fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }
}

/// The backend selected by configuration.
#[derive(Debug, Clone)]
pub enum Client {
    Remote(SupabaseClient),
    Memory(MemoryClient),
}

#[async_trait]
impl DataClient for Client {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, BackendError> {
        match self {
            Self::Remote(client) => client.select(table, query).await,
            Self::Memory(client) => client.select(table, query).await,
        }
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, BackendError> {
        match self {
            Self::Remote(client) => client.insert(table, row).await,
            Self::Memory(client) => client.insert(table, row).await,
        }
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, BackendError> {
        match self {
            Self::Remote(client) => client.update(table, id, patch).await,
            Self::Memory(client) => client.update(table, id, patch).await,
        }
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), BackendError> {
        match self {
            Self::Remote(client) => client.delete(table, id).await,
            Self::Memory(client) => client.delete(table, id).await,
        }
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        match self {
            Self::Remote(client) => client.current_user().await,
            Self::Memory(client) => client.current_user().await,
        }
    }
}

#[async_trait]
impl Authenticator for Client {
    async fn sign_in(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<AuthSession, BackendError> {
        match self {
            Self::Remote(client) => client.sign_in(credentials).await,
            Self::Memory(client) => client.sign_in(credentials).await,
        }
    }

    async fn sign_up(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<Option<AuthSession>, BackendError> {
        match self {
            Self::Remote(client) => client.sign_up(credentials).await,
            Self::Memory(client) => client.sign_up(credentials).await,
        }
    }

    async fn sign_out(&mut self) -> Result<(), BackendError> {
        match self {
            Self::Remote(client) => client.sign_out().await,
            Self::Memory(client) => client.sign_out().await,
        }
    }

    fn restore(&mut self, session: AuthSession) {
        match self {
            Self::Remote(client) => client.restore(session),
            Self::Memory(client) => client.restore(session),
        }
    }

    fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::Remote(client) => client.session(),
            Self::Memory(client) => client.session(),
        }
    }
}
