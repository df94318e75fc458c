use super::model::Session;
use super::provider::{IdentityProvider, ListenerRegistration, SessionListener};
use crate::error::{BlogError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;

/// Tracks the process-wide [`Session`] value.
///
/// `SessionMonitor` is responsible for:
/// - Holding exactly one listener registration with the identity provider
/// - Replacing the session value on every provider notification
/// - Exposing the latest value synchronously and as a change stream
/// - Forwarding sign-out to the provider
pub struct SessionMonitor {
    /// Identity provider capability
    provider: Arc<dyn IdentityProvider>,
    /// Latest session value; receivers observe every replacement
    state: Arc<watch::Sender<Session>>,
    /// Set while a `SessionSubscription` is alive
    subscribed: Arc<AtomicBool>,
    /// Number of status changes observed
    transitions: Arc<AtomicU64>,
}

impl SessionMonitor {
    /// Creates a monitor in the `Unknown` state. No listener is registered
    /// until [`SessionMonitor::subscribe`] is called.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(Session::Unknown);
        Self {
            provider,
            state: Arc::new(state),
            subscribed: Arc::new(AtomicBool::new(false)),
            transitions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registers the monitor's listener with the identity provider.
    ///
    /// # Returns
    ///
    /// A scoped handle; dropping it unregisters the listener.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Internal` if a subscription is already active.
    pub fn subscribe(&self) -> Result<SessionSubscription> {
        if self.subscribed.swap(true, Ordering::SeqCst) {
            return Err(BlogError::internal(
                "session monitor already holds a provider subscription",
            ));
        }

        let state = self.state.clone();
        let transitions = self.transitions.clone();
        let listener: SessionListener = Arc::new(move |identity| {
            let next = Session::from_notification(identity);
            // Counted before publishing so observers never see the new value
            // with the old count
            if state.borrow().status() != next.status() {
                transitions.fetch_add(1, Ordering::SeqCst);
            }
            tracing::debug!("[SessionMonitor] Session changed to {:?}", next.status());
            state.send_replace(next);
        });

        let registration = self.provider.on_session_change(listener);
        tracing::debug!("[SessionMonitor] Subscribed to identity provider");

        Ok(SessionSubscription {
            registration: Some(registration),
            subscribed: self.subscribed.clone(),
        })
    }

    /// Returns the latest session value; `Unknown` before the first notification.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every session replacement.
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Number of status changes seen so far. Repeated notifications with the
    /// same status do not count.
    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::SeqCst)
    }

    /// Returns true while a provider subscription is held.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    /// Signs the current user out.
    ///
    /// The transition to `Anonymous` arrives through the provider
    /// notification, not from this call. On failure the session value is
    /// left as it was. Failures are not retried.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Auth` if the provider rejects the call.
    pub async fn sign_out(&self) -> Result<()> {
        self.provider.sign_out().await.map_err(|e| {
            tracing::warn!("[SessionMonitor] Sign-out failed: {}", e);
            match e {
                BlogError::Auth(_) => e,
                other => BlogError::auth(other.to_string()),
            }
        })
    }

    /// The identity provider this monitor listens to.
    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }
}

/// Scoped provider subscription returned by [`SessionMonitor::subscribe`].
///
/// Released on drop, including when the owning component unwinds.
#[derive(Debug)]
pub struct SessionSubscription {
    registration: Option<ListenerRegistration>,
    subscribed: Arc<AtomicBool>,
}

impl SessionSubscription {
    /// Releases the subscription now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.release();
            self.subscribed.store(false, Ordering::SeqCst);
            tracing::debug!("[SessionMonitor] Released identity provider subscription");
        }
    }
}
