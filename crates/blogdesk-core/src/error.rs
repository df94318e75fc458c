//! Error types for the BlogDesk client core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`BlogError`].
///
/// The presentation layer maps each kind to a distinct transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Persist,
    Fetch,
    Config,
    Internal,
}

/// A shared error type for the entire BlogDesk client.
///
/// None of these errors are fatal: the client stays usable after any of them,
/// and none are retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum BlogError {
    /// Malformed user input, caught before any remote call
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// Identity-provider rejection or missing session for a gated operation
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Entity not found, locally or remotely
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Remote create/update/delete failed after passing validation
    #[error("Persist error: {0}")]
    Persist(String),

    /// Remote list failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlogError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error for the named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Persist error
    pub fn persist(message: impl Into<String>) -> Self {
        Self::Persist(message.into())
    }

    /// Creates a Fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Auth(_) => ErrorKind::Auth,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Persist(_) => ErrorKind::Persist,
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::Config(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Persist error
    pub fn is_persist(&self) -> bool {
        matches!(self, Self::Persist(_))
    }

    /// Check if this is a Fetch error
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BlogError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<toml::de::Error> for BlogError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML - {}", err))
    }
}

impl From<serde_json::Error> for BlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON - {}", err))
    }
}

/// A type alias for `Result<T, BlogError>`.
pub type Result<T> = std::result::Result<T, BlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(BlogError::validation("title", "empty").kind(), ErrorKind::Validation);
        assert_eq!(BlogError::auth("no session").kind(), ErrorKind::Auth);
        assert_eq!(BlogError::not_found("post", "p1").kind(), ErrorKind::NotFound);
        assert_eq!(BlogError::persist("offline").kind(), ErrorKind::Persist);
        assert_eq!(BlogError::fetch("offline").kind(), ErrorKind::Fetch);
    }

    #[test]
    fn test_display_includes_context() {
        let err = BlogError::not_found("post", "p1");
        assert_eq!(err.to_string(), "Entity not found: post 'p1'");

        let err = BlogError::validation("title", "must not be empty");
        assert_eq!(err.to_string(), "Validation error: title: must not be empty");
    }

    #[test]
    fn test_toml_error_becomes_config() {
        let err: BlogError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, BlogError::Config(_)));
    }
}
