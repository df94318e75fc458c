use super::route_guard::Navigator;
use crate::session::SessionMonitor;
use std::sync::{Arc, Mutex};

/// Navigator shared by route guards and account flows.
///
/// Both a guarded view and the sign-out flow react to the same
/// authenticated-to-anonymous transition by sending the user to the entry
/// view. The gate forwards at most one entry-view navigation per session
/// transition; every other navigation passes through untouched.
pub struct RedirectGate {
    inner: Arc<dyn Navigator>,
    monitor: Arc<SessionMonitor>,
    entry_view: String,
    /// Transition count at the last forwarded entry-view navigation
    last_redirect: Mutex<Option<u64>>,
}

impl RedirectGate {
    pub fn new(
        inner: Arc<dyn Navigator>,
        monitor: Arc<SessionMonitor>,
        entry_view: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            monitor,
            entry_view: entry_view.into(),
            last_redirect: Mutex::new(None),
        }
    }
}

impl Navigator for RedirectGate {
    fn navigate(&self, to: &str) {
        if to == self.entry_view {
            let transition = self.monitor.transitions();
            let mut last = self.last_redirect.lock().unwrap_or_else(|e| e.into_inner());
            if *last == Some(transition) {
                tracing::debug!("[RedirectGate] Already redirected to {} for this session", to);
                return;
            }
            *last = Some(transition);
        }
        self.inner.navigate(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;
    use crate::test_support::ScriptedProvider;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, to: &str) {
            self.visits.lock().unwrap().push(to.to_string());
        }
    }

    #[test]
    fn test_one_entry_redirect_per_transition() {
        let provider = Arc::new(ScriptedProvider::default());
        let monitor = Arc::new(SessionMonitor::new(provider.clone()));
        let _subscription = monitor.subscribe().unwrap();
        let recorder = Arc::new(RecordingNavigator::default());
        let gate = RedirectGate::new(recorder.clone(), monitor, "/login");

        provider.emit(Some(Identity::new("u1")));
        gate.navigate("/dashboard");
        gate.navigate("/dashboard");

        provider.emit(None);
        gate.navigate("/login");
        gate.navigate("/login");

        provider.emit(Some(Identity::new("u1")));
        provider.emit(None);
        gate.navigate("/login");

        assert_eq!(
            *recorder.visits.lock().unwrap(),
            vec!["/dashboard", "/dashboard", "/login", "/login"]
        );
    }
}
