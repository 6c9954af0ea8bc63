//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`MissingConfiguration`] when the backend credentials are absent.
//! - [`NotAuthenticated`] when an operation needs a signed-in user.
//! - [`Backend`] when the remote data client rejects or fails a request.
//! - input errors ([`InvalidAmount`], [`InvalidName`], ...) raised before
//!   anything is sent to the backend.
//!
//!  [`MissingConfiguration`]: EngineError::MissingConfiguration
//!  [`NotAuthenticated`]: EngineError::NotAuthenticated
//!  [`Backend`]: EngineError::Backend
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidName`]: EngineError::InvalidName
use thiserror::Error;

use crate::backend::BackendError;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Missing backend configuration: {0}")]
    MissingConfiguration(String),
    #[error("No user found")]
    NotAuthenticated,
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("No transactions to export")]
    NothingToExport,
    #[error("Export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl EngineError {
    /// Returns `true` when the caller should be sent back to the login view.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::Backend(BackendError::Unauthorized)
        )
    }

    /// Returns `true` for errors caused by user input, before any remote
    /// call.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidName(_)
                | Self::InvalidColor(_)
                | Self::InvalidDate(_)
                | Self::ExistingKey(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_backend_errors_route_to_login() {
        assert!(EngineError::NotAuthenticated.is_unauthenticated());
        assert!(EngineError::Backend(BackendError::Unauthorized).is_unauthenticated());
        assert!(!EngineError::Backend(BackendError::Forbidden).is_unauthenticated());
    }

    #[test]
    fn backend_message_is_transparent() {
        let err = EngineError::from(BackendError::Validation("amount is required".to_string()));
        assert_eq!(err.to_string(), "Validation error: amount is required");
    }
}
