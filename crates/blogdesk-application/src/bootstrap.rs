use std::sync::Arc;

use anyhow::{Context, Result};
use blogdesk_core::{
    config::ClientConfig,
    guard::{Navigator, RedirectGate, RouteGuard},
    post::{ContentStore, DocumentStore},
    session::{IdentityProvider, Session, SessionMonitor, SessionSubscription},
};
use blogdesk_infrastructure::ConfigService;
use tokio::sync::watch;

use crate::account_usecase::AccountUseCase;
use crate::dashboard_usecase::DashboardUseCase;
use crate::notice::NoticeCallback;

/// Wires the client core for one application instance.
///
/// Owns the single session subscription for the lifetime of the client.
/// Views get their use cases and route guards from here.
pub struct ClientBootstrap {
    config: ClientConfig,
    monitor: Arc<SessionMonitor>,
    navigator: Arc<dyn Navigator>,
    subscription: Option<SessionSubscription>,
    content: Arc<ContentStore>,
    dashboard: DashboardUseCase,
    account: AccountUseCase,
}

impl ClientBootstrap {
    /// Reads the configuration through `config_service` and wires the client.
    pub fn load(
        config_service: &ConfigService,
        provider: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        navigator: Arc<dyn Navigator>,
        notices: NoticeCallback,
    ) -> Result<Self> {
        let config = config_service
            .get_config()
            .context("Failed to load client configuration")?;
        tracing::info!(
            "[Bootstrap] Config loaded from {:?}",
            config_service.config_path()
        );
        Self::new(config, provider, documents, navigator, notices)
    }

    /// Wires the client from an already loaded configuration.
    ///
    /// Subscribes to the provider immediately; the session stays `Unknown`
    /// until the provider's first notification. `navigator` is wrapped in a
    /// [`RedirectGate`] shared by route guards and the account flows.
    pub fn new(
        config: ClientConfig,
        provider: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        navigator: Arc<dyn Navigator>,
        notices: NoticeCallback,
    ) -> Result<Self> {
        let monitor = Arc::new(SessionMonitor::new(provider));
        let subscription = monitor
            .subscribe()
            .context("Failed to subscribe to session changes")?;

        let content = Arc::new(ContentStore::new(
            documents,
            monitor.clone(),
            config.collection.clone(),
        ));
        // Mounted when the dashboard opens
        content.deactivate();

        let navigator: Arc<dyn Navigator> = Arc::new(RedirectGate::new(
            navigator,
            monitor.clone(),
            config.entry_view.clone(),
        ));

        let dashboard = DashboardUseCase::new(content.clone(), notices.clone());
        let account = AccountUseCase::new(
            monitor.clone(),
            navigator.clone(),
            config.clone(),
            notices,
        );

        tracing::info!(
            "[Bootstrap] Client ready (collection: {}, entry view: {})",
            config.collection,
            config.entry_view
        );

        Ok(Self {
            config,
            monitor,
            navigator,
            subscription: Some(subscription),
            content,
            dashboard,
            account,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.monitor.current()
    }

    /// Receiver for session changes, used to drive route guards.
    pub fn watch_session(&self) -> watch::Receiver<Session> {
        self.monitor.watch()
    }

    pub fn monitor(&self) -> &Arc<SessionMonitor> {
        &self.monitor
    }

    /// Navigator to hand to [`RouteGuard::run`].
    pub fn navigator(&self) -> Arc<dyn Navigator> {
        self.navigator.clone()
    }

    pub fn content(&self) -> &Arc<ContentStore> {
        &self.content
    }

    pub fn dashboard(&self) -> &DashboardUseCase {
        &self.dashboard
    }

    pub fn account(&self) -> &AccountUseCase {
        &self.account
    }

    /// Wraps `view` in a guard redirecting anonymous sessions to the entry view.
    pub fn protected_route<V>(&self, view: V) -> RouteGuard<V> {
        RouteGuard::new(view, self.config.entry_view.clone())
    }

    /// Closes the dashboard and releases the session subscription.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.dashboard.close();
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
            tracing::info!("[Bootstrap] Session subscription released");
        }
    }
}

impl Drop for ClientBootstrap {
    fn drop(&mut self) {
        self.shutdown();
    }
}
