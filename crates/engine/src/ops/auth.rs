use api_types::auth::{AuthSession, AuthUser, PasswordCredentials};

use crate::{
    EngineError, ResultEngine,
    backend::{Authenticator, BackendError, DataClient},
};

use super::Engine;

fn credentials(email: &str, password: &str) -> ResultEngine<PasswordCredentials> {
    let email = email.trim();
    if email.is_empty() {
        return Err(EngineError::InvalidName("email must not be empty".to_string()));
    }
    if password.is_empty() {
        return Err(EngineError::InvalidName(
            "password must not be empty".to_string(),
        ));
    }
    Ok(PasswordCredentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Session lifecycle. Every identity change drops the cached queries.
impl<C: DataClient + Authenticator> Engine<C> {
    pub async fn sign_in(&mut self, email: &str, password: &str) -> ResultEngine<AuthSession> {
        let credentials = credentials(email, password)?;
        let session = self.client.sign_in(&credentials).await?;
        self.cache.clear();
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// `None` when the backend asks for an email confirmation first.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
    ) -> ResultEngine<Option<AuthSession>> {
        let credentials = credentials(email, password)?;
        let session = self.client.sign_up(&credentials).await?;
        self.cache.clear();
        match &session {
            Some(session) => tracing::info!(user_id = %session.user.id, "signed up"),
            None => tracing::info!("signed up, confirmation pending"),
        }
        Ok(session)
    }

    pub async fn sign_out(&mut self) -> ResultEngine<()> {
        let result = self.client.sign_out().await;
        self.cache.clear();
        tracing::info!("signed out");
        Ok(result?)
    }

    /// Reuses a persisted session. Returns the user it belongs to, or
    /// `None` when the backend no longer accepts it.
    pub async fn restore_session(
        &mut self,
        session: AuthSession,
    ) -> ResultEngine<Option<AuthUser>> {
        self.client.restore(session);
        self.cache.clear();
        match self.current_user().await {
            Ok(Some(user)) => Ok(Some(user)),
            Ok(None) | Err(EngineError::Backend(BackendError::Unauthorized)) => {
                tracing::warn!("stored session rejected");
                self.client.sign_out().await.ok();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.client.session()
    }
}
