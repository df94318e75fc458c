//! Identity provider capability.
//!
//! Defines the interface the client consumes from the external identity
//! provider: credential operations plus a change-notification stream.

use super::model::Identity;
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with `Some(identity)` when a user is signed in and
/// `None` when nobody is.
pub type SessionListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Profile data attached to a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpProfile {
    pub display_name: String,
    /// Optional business the account registers for
    pub business_name: Option<String>,
}

/// Scoped registration of a [`SessionListener`].
///
/// Dropping the registration unregisters the listener. The release closure
/// runs at most once.
pub struct ListenerRegistration {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerRegistration {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Unregisters the listener now instead of at drop.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// An abstract identity provider.
///
/// Implementations issue and validate credentials and notify registered
/// listeners whenever the signed-in user changes. Timeouts are the
/// implementation's concern.
///
/// All credential failures are reported as [`crate::error::BlogError::Auth`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a listener for session changes.
    ///
    /// Implementations deliver the current state to the new listener at some
    /// point after registration, then every subsequent change.
    fn on_session_change(&self, listener: SessionListener) -> ListenerRegistration;

    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Creates an account and signs it in.
    ///
    /// Fails on duplicate or invalid email and on weak passwords.
    async fn sign_up(&self, email: &str, password: &str, profile: SignUpProfile) -> Result<Identity>;

    /// Signs the current user out.
    async fn sign_out(&self) -> Result<()>;

    /// Re-verifies the current user's credentials before a sensitive change.
    async fn reauthenticate(&self, email: &str, password: &str) -> Result<()>;

    /// Replaces the current user's password. Requires a recent
    /// [`IdentityProvider::reauthenticate`].
    async fn update_password(&self, new_password: &str) -> Result<()>;
}
