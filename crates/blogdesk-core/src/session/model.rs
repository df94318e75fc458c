//! Session domain model.
//!
//! Represents the tri-state authentication status of the client process.

use serde::{Deserialize, Serialize};

/// An opaque user reference issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned user id
    pub uid: String,
    /// Optional display name ("First Last" after registration)
    #[serde(default)]
    pub display_name: Option<String>,
    /// Sign-in email, when the provider exposes it
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name shown in the navigation bar; falls back to "User".
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or("User")
    }
}

/// Status part of a [`Session`], without the identity payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Unknown,
    Anonymous,
    Authenticated,
}

/// Current authentication status of the client.
///
/// Starts as `Unknown` and only changes when the identity provider
/// delivers a change notification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "identity", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Unknown,
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    /// Maps a provider notification payload onto a session value.
    pub fn from_notification(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => Self::Authenticated(identity),
            None => Self::Anonymous,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Unknown => SessionStatus::Unknown,
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_unknown() {
        let session = Session::default();
        assert_eq!(session.status(), SessionStatus::Unknown);
        assert!(!session.is_resolved());
        assert!(session.identity().is_none());
    }

    #[test]
    fn test_from_notification() {
        let session = Session::from_notification(Some(Identity::new("u1")));
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(session.identity().map(|i| i.uid.as_str()), Some("u1"));

        let session = Session::from_notification(None);
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(session.is_resolved());
    }

    #[test]
    fn test_identity_label_fallback() {
        assert_eq!(Identity::new("u1").label(), "User");
        assert_eq!(Identity::new("u1").with_display_name("Ada Lovelace").label(), "Ada Lovelace");
    }
}
