//! In-process identity provider.
//!
//! Keeps accounts in memory and notifies registered listeners on every
//! sign-in, sign-up and sign-out. Useful for demos, tests and offline
//! development; production builds plug in a remote provider instead.

use async_trait::async_trait;
use blogdesk_core::error::{BlogError, Result};
use blogdesk_core::session::{
    Identity, IdentityProvider, ListenerRegistration, SessionListener, SignUpProfile,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Provider-side minimum password length, independent of client config.
pub const PROVIDER_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
    display_name: Option<String>,
    business_name: Option<String>,
}

impl Account {
    fn identity(&self, email: &str) -> Identity {
        Identity {
            uid: self.uid.clone(),
            display_name: self.display_name.clone(),
            email: Some(email.to_string()),
        }
    }
}

#[derive(Default)]
struct ProviderState {
    /// Accounts keyed by email
    accounts: HashMap<String, Account>,
    /// Email of the signed-in account
    current: Option<String>,
    /// Whether the initial session state has been determined
    resolved: bool,
    /// Set by a successful reauthenticate, consumed by update_password
    reauthenticated: bool,
}

impl ProviderState {
    fn current_identity(&self) -> Option<Identity> {
        let email = self.current.as_ref()?;
        self.accounts.get(email).map(|a| a.identity(email))
    }
}

/// Identity provider backed by in-memory accounts.
///
/// # Example
///
/// ```
/// use blogdesk_infrastructure::InMemoryIdentityProvider;
///
/// let provider = InMemoryIdentityProvider::new();
/// provider.add_account("ada@example.com", "analytical", Some("Ada Lovelace"));
/// ```
#[derive(Clone)]
pub struct InMemoryIdentityProvider {
    state: Arc<Mutex<ProviderState>>,
    listeners: Arc<Mutex<Vec<(u64, SessionListener)>>>,
    next_listener_id: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryIdentityProvider {
    /// Creates a provider whose session state is already known; listeners
    /// receive it immediately on registration.
    pub fn new() -> Self {
        let provider = Self::pending();
        provider.lock_state().resolved = true;
        provider
    }

    /// Creates a provider still restoring its session; listeners receive
    /// nothing until [`InMemoryIdentityProvider::resolve`] is called.
    pub fn pending() -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState::default())),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: Arc::new(AtomicU64::new(0)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Finishes session restore and notifies every registered listener.
    pub fn resolve(&self) {
        let current = {
            let mut state = self.lock_state();
            state.resolved = true;
            state.current_identity()
        };
        self.notify(current);
    }

    /// Adds an account without signing it in.
    pub fn add_account(&self, email: &str, password: &str, display_name: Option<&str>) -> Identity {
        let account = Account {
            uid: Uuid::new_v4().simple().to_string(),
            password: password.to_string(),
            display_name: display_name.map(str::to_string),
            business_name: None,
        };
        let identity = account.identity(email);
        self.lock_state().accounts.insert(email.to_string(), account);
        identity
    }

    /// Makes every provider call fail with `BlogError::Auth` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Password currently stored for `email`.
    pub fn password_of(&self, email: &str) -> Option<String> {
        self.lock_state()
            .accounts
            .get(email)
            .map(|a| a.password.clone())
    }

    /// Business name recorded at registration, if any.
    pub fn business_name_of(&self, email: &str) -> Option<String> {
        self.lock_state()
            .accounts
            .get(email)
            .and_then(|a| a.business_name.clone())
    }

    fn lock_state(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BlogError::auth("Identity provider unavailable"));
        }
        Ok(())
    }

    fn notify(&self, identity: Option<Identity>) {
        // Snapshot so listeners may register or release while being called
        let listeners: Vec<SessionListener> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        tracing::debug!(
            "[IdentityProvider] Notifying {} listeners (signed_in: {})",
            listeners.len(),
            identity.is_some()
        );
        for listener in listeners {
            listener(identity.clone());
        }
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn on_session_change(&self, listener: SessionListener) -> ListenerRegistration {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, listener.clone()));

        let initial = {
            let state = self.lock_state();
            state.resolved.then(|| state.current_identity())
        };
        if let Some(identity) = initial {
            listener(identity);
        }

        let listeners = self.listeners.clone();
        ListenerRegistration::new(move || {
            listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|(lid, _)| *lid != id);
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.check_available()?;
        let identity = {
            let mut state = self.lock_state();
            let identity = match state.accounts.get(email) {
                Some(account) if account.password == password => account.identity(email),
                _ => return Err(BlogError::auth("Invalid credentials")),
            };
            state.current = Some(email.to_string());
            state.reauthenticated = false;
            identity
        };
        tracing::info!("[IdentityProvider] Signed in {}", identity.uid);
        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str, profile: SignUpProfile) -> Result<Identity> {
        self.check_available()?;
        if !email.contains('@') {
            return Err(BlogError::auth("Invalid email"));
        }
        if password.chars().count() < PROVIDER_MIN_PASSWORD_LENGTH {
            return Err(BlogError::auth("Weak password"));
        }

        let identity = {
            let mut state = self.lock_state();
            if state.accounts.contains_key(email) {
                return Err(BlogError::auth("Email already in use"));
            }
            let display_name = Some(profile.display_name).filter(|n| !n.is_empty());
            let account = Account {
                uid: Uuid::new_v4().simple().to_string(),
                password: password.to_string(),
                display_name,
                business_name: profile.business_name,
            };
            let identity = account.identity(email);
            state.accounts.insert(email.to_string(), account);
            state.current = Some(email.to_string());
            state.reauthenticated = false;
            identity
        };
        tracing::info!("[IdentityProvider] Registered {}", identity.uid);
        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        self.check_available()?;
        {
            let mut state = self.lock_state();
            state.current = None;
            state.reauthenticated = false;
        }
        self.notify(None);
        Ok(())
    }

    async fn reauthenticate(&self, email: &str, password: &str) -> Result<()> {
        self.check_available()?;
        let mut state = self.lock_state();
        let matches = state.current.as_deref() == Some(email)
            && state
                .accounts
                .get(email)
                .is_some_and(|a| a.password == password);
        if !matches {
            return Err(BlogError::auth("Reauthentication failed"));
        }
        state.reauthenticated = true;
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<()> {
        self.check_available()?;
        if new_password.chars().count() < PROVIDER_MIN_PASSWORD_LENGTH {
            return Err(BlogError::auth("Weak password"));
        }
        let mut state = self.lock_state();
        if !state.reauthenticated {
            return Err(BlogError::auth("Recent login required"));
        }
        let email = state
            .current
            .clone()
            .ok_or_else(|| BlogError::auth("No user signed in"))?;
        let account = state
            .accounts
            .get_mut(&email)
            .ok_or_else(|| BlogError::auth("No user signed in"))?;
        account.password = new_password.to_string();
        state.reauthenticated = false;
        Ok(())
    }
}
