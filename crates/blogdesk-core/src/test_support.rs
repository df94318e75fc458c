//! Test doubles for the identity provider and document store capabilities.

use crate::error::{BlogError, Result};
use crate::post::{Document, DocumentStore, Fields};
use crate::session::{Identity, IdentityProvider, ListenerRegistration, SessionListener, SignUpProfile};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// Provider whose notifications are driven by the test
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    listeners: Arc<Mutex<Vec<(usize, SessionListener)>>>,
    next_id: AtomicUsize,
    fail_sign_out: AtomicBool,
}

impl ScriptedProvider {
    pub(crate) fn emit(&self, identity: Option<Identity>) {
        let listeners: Vec<SessionListener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(identity.clone());
        }
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub(crate) fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ScriptedProvider {
    fn on_session_change(&self, listener: SessionListener) -> ListenerRegistration {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().push((id, listener));
        let listeners = self.listeners.clone();
        ListenerRegistration::new(move || {
            listeners.lock().unwrap().retain(|(lid, _)| *lid != id);
        })
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity> {
        Ok(Identity::new("u1"))
    }

    async fn sign_up(&self, _: &str, _: &str, _: SignUpProfile) -> Result<Identity> {
        Ok(Identity::new("u1"))
    }

    async fn sign_out(&self) -> Result<()> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(BlogError::auth("network unavailable"));
        }
        Ok(())
    }

    async fn reauthenticate(&self, _: &str, _: &str) -> Result<()> {
        Ok(())
    }

    async fn update_password(&self, _: &str) -> Result<()> {
        Ok(())
    }
}

// Document store backed by a Vec, with a switch that fails every call
#[derive(Default)]
pub(crate) struct ScriptedStore {
    documents: Mutex<Vec<Document>>,
    next_id: AtomicUsize,
    offline: AtomicBool,
    calls: AtomicUsize,
    list_gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedStore {
    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn insert(&self, id: &str, fields: Fields) {
        self.documents.lock().unwrap().push(Document {
            id: id.to_string(),
            fields,
        });
    }

    pub(crate) fn document(&self, id: &str) -> Option<Document> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    // The next list_all snapshots the documents, then waits for the returned
    // notify before answering.
    pub(crate) fn hold_next_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn enter(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.offline.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentStore for ScriptedStore {
    async fn list_all(&self, _collection: &str) -> Result<Vec<Document>> {
        if self.enter() {
            return Err(BlogError::fetch("store offline"));
        }
        let snapshot = self.documents.lock().unwrap().clone();
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn create(&self, _collection: &str, fields: Fields) -> Result<String> {
        if self.enter() {
            return Err(BlogError::persist("store offline"));
        }
        let id = format!("p{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.insert(&id, fields);
        Ok(id)
    }

    async fn update(&self, _collection: &str, id: &str, fields: Fields) -> Result<()> {
        if self.enter() {
            return Err(BlogError::persist("store offline"));
        }
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| BlogError::not_found("document", id))?;
        document.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, _collection: &str, id: &str) -> Result<()> {
        if self.enter() {
            return Err(BlogError::persist("store offline"));
        }
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Err(BlogError::not_found("document", id));
        }
        Ok(())
    }
}
