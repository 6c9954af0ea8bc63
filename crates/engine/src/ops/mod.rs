use api_types::auth::AuthUser;

use crate::{
    EngineError, ResultEngine,
    backend::{BackendError, DataClient, Row, from_row},
    cache::QueryCache,
};

mod auth;
mod categories;
mod transactions;

pub use transactions::RECENT_LIMIT;

/// Data-access layer over a [`DataClient`].
///
/// Reads are served from a [`QueryCache`] and refetched once a write marked
/// them stale.
#[derive(Debug)]
pub struct Engine<C> {
    client: C,
    cache: QueryCache,
}

impl<C> Engine<C> {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder<C> {
        EngineBuilder { client: None }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Marks every cached query stale.
    pub fn refresh(&mut self) {
        self.cache.invalidate(|_| true);
    }
}

impl<C: DataClient> Engine<C> {
    /// The signed-in user, `None` without a valid session.
    pub async fn current_user(&self) -> ResultEngine<Option<AuthUser>> {
        Ok(self.client.current_user().await?)
    }

    async fn require_user(&self) -> ResultEngine<AuthUser> {
        match self.client.current_user().await {
            Ok(Some(user)) => Ok(user),
            Ok(None) | Err(BackendError::Unauthorized) => Err(EngineError::NotAuthenticated),
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_rows<T, U>(rows: Vec<Row>) -> ResultEngine<Vec<U>>
where
    T: serde::de::DeserializeOwned,
    U: From<T>,
{
    rows.into_iter()
        .map(|row| from_row::<T>(row).map(U::from).map_err(EngineError::from))
        .collect()
}

/// The builder for `Engine`
pub struct EngineBuilder<C> {
    client: Option<C>,
}

impl<C> EngineBuilder<C> {
    /// Pass the required data client
    #[must_use]
    pub fn client(mut self, client: C) -> EngineBuilder<C> {
        self.client = Some(client);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine<C>> {
        let client = self
            .client
            .ok_or_else(|| EngineError::MissingConfiguration("data client".to_string()))?;
        Ok(Engine {
            client,
            cache: QueryCache::new(),
        })
    }
}
