use std::{fs, path::Path};

use api_types::auth::AuthSession;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What survives a restart: the last session and the last email used to
/// sign in.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LocalState {
    #[serde(default)]
    pub session: Option<AuthSession>,
    #[serde(default)]
    pub last_email: Option<String>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn remember(&mut self, session: AuthSession) {
        self.last_email = session.user.email.clone().or(self.last_email.take());
        self.session = Some(session);
    }

    pub fn forget_session(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use api_types::auth::AuthUser;
    use uuid::Uuid;

    use super::*;

    fn temp_path() -> String {
        std::env::temp_dir()
            .join(format!("pennywise_state_{}", Uuid::new_v4()))
            .join("state.json")
            .display()
            .to_string()
    }

    #[test]
    fn missing_file_is_empty_state() {
        assert_eq!(LocalState::load(&temp_path()).unwrap(), LocalState::default());
    }

    #[test]
    fn session_survives_a_save() {
        let path = temp_path();
        let mut state = LocalState::default();
        state.remember(AuthSession {
            access_token: "token".to_string(),
            refresh_token: Some("refresh".to_string()),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some("alice@example.com".to_string()),
            },
        });
        state.save(&path).unwrap();

        let mut loaded = LocalState::load(&path).unwrap();
        assert_eq!(loaded, state);

        loaded.forget_session();
        assert!(loaded.session.is_none());
        assert_eq!(loaded.last_email.as_deref(), Some("alice@example.com"));
    }
}
