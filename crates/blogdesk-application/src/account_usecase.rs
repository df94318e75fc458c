//! Account use case implementation.
//!
//! Sign-in, registration, sign-out and password change on top of the
//! identity provider. Session transitions are never applied here; they
//! arrive through the provider's notifications to the `SessionMonitor`.

use crate::notice::{Action, Notice, NoticeCallback};
use blogdesk_core::account::{PasswordChange, SignInRequest, SignUpRequest};
use blogdesk_core::config::ClientConfig;
use blogdesk_core::error::{BlogError, Result};
use blogdesk_core::guard::Navigator;
use blogdesk_core::session::{Identity, SessionMonitor, SignUpProfile};
use std::sync::Arc;

/// Use case behind the login, register, navbar and profile views.
pub struct AccountUseCase {
    /// Session monitor (also gives access to the identity provider)
    monitor: Arc<SessionMonitor>,
    /// Navigation capability of the presentation layer
    navigator: Arc<dyn Navigator>,
    /// Client configuration (views, password policy)
    config: ClientConfig,
    /// Receives a notice for every outcome
    notices: NoticeCallback,
}

impl AccountUseCase {
    pub fn new(
        monitor: Arc<SessionMonitor>,
        navigator: Arc<dyn Navigator>,
        config: ClientConfig,
        notices: NoticeCallback,
    ) -> Self {
        Self {
            monitor,
            navigator,
            config,
            notices,
        }
    }

    /// Signs in and navigates to the home view.
    ///
    /// # Errors
    ///
    /// - `BlogError::Validation` if email or password is empty (no provider call)
    /// - `BlogError::Auth` if the provider rejects the credentials
    pub async fn sign_in(&self, request: SignInRequest) -> Result<Identity> {
        let result = self.try_sign_in(&request).await;
        let identity = self.report(Action::SignIn, result)?;
        self.navigator.navigate(&self.config.home_view);
        Ok(identity)
    }

    /// Creates an account and navigates to the entry view.
    ///
    /// # Errors
    ///
    /// - `BlogError::Validation` for a short password or mismatched
    ///   confirmation (no provider call)
    /// - `BlogError::Auth` if the provider rejects the registration
    pub async fn register(&self, request: SignUpRequest) -> Result<Identity> {
        let result = self.try_register(&request).await;
        let identity = self.report(Action::Register, result)?;
        self.navigator.navigate(&self.config.entry_view);
        Ok(identity)
    }

    /// Signs out and navigates to the entry view.
    ///
    /// When the navigator is the client's [`RedirectGate`], a route guard
    /// reacting to the same sign-out does not add a second redirect.
    ///
    /// [`RedirectGate`]: blogdesk_core::guard::RedirectGate
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Auth` if the provider call fails; the session is
    /// left unchanged and no navigation happens.
    pub async fn sign_out(&self) -> Result<()> {
        let result = self.monitor.sign_out().await;
        self.report(Action::SignOut, result)?;
        self.navigator.navigate(&self.config.entry_view);
        Ok(())
    }

    /// Changes the signed-in user's password.
    ///
    /// Reauthenticates with the old password, then updates the credential.
    ///
    /// # Errors
    ///
    /// - `BlogError::Auth` without a signed-in user, or if either provider
    ///   step fails
    /// - `BlogError::Validation` for a short or unconfirmed new password
    pub async fn change_password(&self, change: PasswordChange) -> Result<()> {
        let result = self.try_change_password(&change).await;
        self.report(Action::ChangePassword, result)
    }

    async fn try_sign_in(&self, request: &SignInRequest) -> Result<Identity> {
        request.validate()?;
        self.monitor
            .provider()
            .sign_in(request.email.trim(), &request.password)
            .await
            .map_err(into_auth)
    }

    async fn try_register(&self, request: &SignUpRequest) -> Result<Identity> {
        request.validate(self.config.min_password_length)?;
        let profile = SignUpProfile {
            display_name: request.display_name(),
            business_name: request
                .business_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };
        let identity = self
            .monitor
            .provider()
            .sign_up(request.email.trim(), &request.password, profile)
            .await
            .map_err(into_auth)?;
        tracing::info!("[Account] Registered {}", identity.uid);
        Ok(identity)
    }

    async fn try_change_password(&self, change: &PasswordChange) -> Result<()> {
        let identity = self
            .monitor
            .current()
            .identity()
            .cloned()
            .ok_or_else(|| BlogError::auth("You need to be logged in to view your profile."))?;
        let email = identity
            .email
            .ok_or_else(|| BlogError::auth("Signed-in account has no email"))?;
        change.validate(self.config.min_password_length)?;

        let provider = self.monitor.provider();
        provider
            .reauthenticate(&email, &change.old_password)
            .await
            .map_err(into_auth)?;
        provider
            .update_password(&change.new_password)
            .await
            .map_err(into_auth)?;
        tracing::info!("[Account] Password changed for {}", identity.uid);
        Ok(())
    }

    fn report<T>(&self, action: Action, result: Result<T>) -> Result<T> {
        let notice = match &result {
            Ok(_) => Notice::completed(action),
            Err(e) => {
                tracing::debug!("[Account] {:?} failed: {}", action, e);
                Notice::failed(action, e)
            }
        };
        (self.notices)(notice);
        result
    }
}

fn into_auth(err: BlogError) -> BlogError {
    match err {
        BlogError::Auth(_) => err,
        other => BlogError::auth(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdesk_core::session::{IdentityProvider, SessionSubscription};
    use blogdesk_infrastructure::InMemoryIdentityProvider;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, to: &str) {
            self.visits.lock().unwrap().push(to.to_string());
        }
    }

    struct Fixture {
        provider: InMemoryIdentityProvider,
        monitor: Arc<SessionMonitor>,
        navigator: Arc<RecordingNavigator>,
        account: AccountUseCase,
        notices: Arc<Mutex<Vec<Notice>>>,
        _subscription: SessionSubscription,
    }

    fn fixture() -> Fixture {
        let provider = InMemoryIdentityProvider::new();
        provider.add_account("ada@example.com", "analytical", Some("Ada Lovelace"));
        let monitor = Arc::new(SessionMonitor::new(Arc::new(provider.clone())));
        let subscription = monitor.subscribe().unwrap();
        let navigator = Arc::new(RecordingNavigator::default());
        let notices: Arc<Mutex<Vec<Notice>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = notices.clone();
        let account = AccountUseCase::new(
            monitor.clone(),
            navigator.clone(),
            ClientConfig::default(),
            Arc::new(move |notice| sink.lock().unwrap().push(notice)),
        );
        Fixture {
            provider,
            monitor,
            navigator,
            account,
            notices,
            _subscription: subscription,
        }
    }

    fn sign_up(email: &str, password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
            business_name: None,
        }
    }

    #[tokio::test]
    async fn test_sign_in_navigates_home_and_session_follows() {
        let f = fixture();

        f.account
            .sign_in(SignInRequest::new("ada@example.com", "analytical"))
            .await
            .unwrap();

        assert!(f.monitor.current().is_authenticated());
        assert_eq!(*f.navigator.visits.lock().unwrap(), vec!["/dashboard".to_string()]);
    }

    #[tokio::test]
    async fn test_sign_in_with_bad_password_is_auth_error() {
        let f = fixture();

        let result = f
            .account
            .sign_in(SignInRequest::new("ada@example.com", "wrong"))
            .await;

        assert!(matches!(result, Err(BlogError::Auth(_))));
        assert!(f.navigator.visits.lock().unwrap().is_empty());
        let last = f.notices.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.message, "Invalid credentials. Please try again.");
    }

    #[tokio::test]
    async fn test_register_validates_before_provider() {
        let f = fixture();
        // Provider would accept 6 characters; client policy requires 8
        let result = f
            .account
            .register(sign_up("grace@example.com", "cobol1", "cobol1"))
            .await;
        assert!(matches!(result, Err(BlogError::Validation { .. })));

        let result = f
            .account
            .register(sign_up("grace@example.com", "compiler", "compilers"))
            .await;
        assert!(matches!(result, Err(BlogError::Validation { .. })));

        assert!(f.provider.password_of("grace@example.com").is_none());
    }

    #[tokio::test]
    async fn test_register_sets_display_name_and_navigates_to_entry() {
        let f = fixture();

        let identity = f
            .account
            .register(sign_up("grace@example.com", "compiler", "compiler"))
            .await
            .unwrap();

        assert_eq!(identity.display_name.as_deref(), Some("Grace Hopper"));
        assert_eq!(*f.navigator.visits.lock().unwrap(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn test_register_stores_business_name() {
        let f = fixture();
        let mut request = sign_up("grace@example.com", "compiler", "compiler");
        request.business_name = Some("  Remington Rand ".into());

        f.account.register(request).await.unwrap();
        f.account
            .register(sign_up("alan@example.com", "enigmatic", "enigmatic"))
            .await
            .unwrap();

        assert_eq!(
            f.provider.business_name_of("grace@example.com").as_deref(),
            Some("Remington Rand")
        );
        assert_eq!(f.provider.business_name_of("alan@example.com"), None);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_auth_error() {
        let f = fixture();

        let result = f
            .account
            .register(sign_up("ada@example.com", "analytical", "analytical"))
            .await;

        assert!(matches!(result, Err(BlogError::Auth(_))));
    }

    #[tokio::test]
    async fn test_change_password_reauthenticates_then_updates() {
        let f = fixture();
        f.provider
            .sign_in("ada@example.com", "analytical")
            .await
            .unwrap();

        f.account
            .change_password(PasswordChange {
                old_password: "analytical".into(),
                new_password: "difference".into(),
                confirm_password: "difference".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            f.provider.password_of("ada@example.com").as_deref(),
            Some("difference")
        );
    }

    #[tokio::test]
    async fn test_change_password_with_wrong_old_password_fails() {
        let f = fixture();
        f.provider
            .sign_in("ada@example.com", "analytical")
            .await
            .unwrap();

        let result = f
            .account
            .change_password(PasswordChange {
                old_password: "guess".into(),
                new_password: "difference".into(),
                confirm_password: "difference".into(),
            })
            .await;

        assert!(matches!(result, Err(BlogError::Auth(_))));
        assert_eq!(
            f.provider.password_of("ada@example.com").as_deref(),
            Some("analytical")
        );
    }

    #[tokio::test]
    async fn test_change_password_requires_session() {
        let f = fixture();

        let result = f
            .account
            .change_password(PasswordChange {
                old_password: "analytical".into(),
                new_password: "difference".into(),
                confirm_password: "difference".into(),
            })
            .await;

        assert!(matches!(result, Err(BlogError::Auth(_))));
    }

    #[tokio::test]
    async fn test_sign_out_failure_keeps_session_and_does_not_navigate() {
        let f = fixture();
        f.provider
            .sign_in("ada@example.com", "analytical")
            .await
            .unwrap();
        f.provider.set_unavailable(true);

        let result = f.account.sign_out().await;

        assert!(matches!(result, Err(BlogError::Auth(_))));
        assert!(f.monitor.current().is_authenticated());
        assert!(f.navigator.visits.lock().unwrap().is_empty());
    }
}
