use crate::session::Session;
use std::sync::Arc;
use tokio::sync::watch;

/// Navigation capability of the presentation layer.
pub trait Navigator: Send + Sync {
    /// Moves the client to the given view path.
    fn navigate(&self, to: &str);
}

/// What a guarded route shows for one session value.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame<'a, V> {
    /// Neutral placeholder while the session is unresolved
    Loading,
    /// The protected view itself
    View(&'a V),
    /// Nothing; a redirect has been issued
    Blank,
}

impl<V> Frame<'_, V> {
    pub fn is_view(&self) -> bool {
        matches!(self, Frame::View(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Admitted,
    Redirected,
}

/// Gates a protected view behind the session.
///
/// The guard is re-evaluated on every session change:
/// - `Unknown` renders the loading placeholder only
/// - `Authenticated` renders the view
/// - `Anonymous` navigates once to the entry view and renders nothing
///
/// Falling back to `Anonymous` after having been admitted (sign-out while the
/// view is open) issues the redirect again.
pub struct RouteGuard<V> {
    view: V,
    entry_view: String,
    phase: Phase,
    redirects: usize,
}

impl<V> RouteGuard<V> {
    /// Creates a guard for `view` that redirects anonymous users to `entry_view`.
    pub fn new(view: V, entry_view: impl Into<String>) -> Self {
        Self {
            view,
            entry_view: entry_view.into(),
            phase: Phase::Pending,
            redirects: 0,
        }
    }

    /// Decides what to render for `session`, navigating if required.
    pub fn evaluate(&mut self, session: &Session, navigator: &dyn Navigator) -> Frame<'_, V> {
        match session {
            Session::Unknown => Frame::Loading,
            Session::Authenticated(_) => {
                self.phase = Phase::Admitted;
                Frame::View(&self.view)
            }
            Session::Anonymous => {
                if self.phase != Phase::Redirected {
                    self.phase = Phase::Redirected;
                    self.redirects += 1;
                    tracing::debug!("[RouteGuard] Redirecting to {}", self.entry_view);
                    navigator.navigate(&self.entry_view);
                }
                Frame::Blank
            }
        }
    }

    /// Number of redirects issued during this activation.
    pub fn redirects(&self) -> usize {
        self.redirects
    }

    pub fn entry_view(&self) -> &str {
        &self.entry_view
    }

    /// Renders for the current session and then for every change until the
    /// session source is dropped.
    ///
    /// Dropping the returned future tears the route down.
    pub async fn run<F>(
        mut self,
        mut sessions: watch::Receiver<Session>,
        navigator: Arc<dyn Navigator>,
        mut render: F,
    ) where
        F: FnMut(Frame<'_, V>),
    {
        loop {
            let session = sessions.borrow_and_update().clone();
            render(self.evaluate(&session, navigator.as_ref()));
            if sessions.changed().await.is_err() {
                break;
            }
        }
    }
}
