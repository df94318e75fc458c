use blogdesk_application::{ClientEvent, init_tracing};
use blogdesk_core::session::SessionMonitor;
use blogdesk_infrastructure::InMemoryIdentityProvider;
use std::sync::Arc;
use tokio::sync::mpsc;

fn drain(receiver: &mut mpsc::UnboundedReceiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

// The global subscriber can be installed once per process, so this binary
// holds a single test.
#[test]
fn test_init_tracing_installs_filter_and_event_layer() {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    init_tracing(Some("blogdesk_core=debug,tracing_init=info"), Some(sender)).unwrap();

    tracing::info!(attempt = 1u64, "[Test] Client starting");
    tracing::debug!("[Test] Filtered out");

    let monitor = SessionMonitor::new(Arc::new(InMemoryIdentityProvider::new()));
    let subscription = monitor.subscribe().unwrap();
    subscription.release();

    let events = drain(&mut receiver);
    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();

    assert!(messages.contains(&"[Test] Client starting"));
    assert!(!messages.contains(&"[Test] Filtered out"));
    let started = events
        .iter()
        .find(|e| e.message == "[Test] Client starting")
        .unwrap();
    assert_eq!(started.level, "INFO");
    assert_eq!(started.fields.get("attempt"), Some(&serde_json::json!(1)));

    let core: Vec<&ClientEvent> = events
        .iter()
        .filter(|e| e.target.starts_with("blogdesk_core"))
        .collect();
    assert!(
        core.iter()
            .any(|e| e.message == "[SessionMonitor] Subscribed to identity provider")
    );
    assert!(core.iter().all(|e| e.level == "DEBUG" || e.level == "INFO"));

    assert!(init_tracing(None, None).is_err());
}
