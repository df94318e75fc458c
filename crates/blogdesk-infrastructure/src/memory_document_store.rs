//! In-process document store.
//!
//! Collections are ordered by insertion. Individual operations can be made to
//! fail, which lets callers exercise the client's error paths.

use async_trait::async_trait;
use blogdesk_core::error::{BlogError, Result};
use blogdesk_core::post::{Document, DocumentStore, Fields};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Operations of the document store, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, Vec<Document>>,
    failing: HashSet<StoreOp>,
    queued_ids: VecDeque<String>,
}

/// Document store backed by in-memory collections.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `op` fail until [`InMemoryDocumentStore::recover`] is called.
    pub fn fail_on(&self, op: StoreOp) {
        self.lock_state().failing.insert(op);
    }

    pub fn recover(&self, op: StoreOp) {
        self.lock_state().failing.remove(&op);
    }

    /// Fails every operation while set.
    pub fn set_offline(&self, offline: bool) {
        let mut state = self.lock_state();
        for op in [StoreOp::List, StoreOp::Create, StoreOp::Update, StoreOp::Delete] {
            if offline {
                state.failing.insert(op);
            } else {
                state.failing.remove(&op);
            }
        }
    }

    /// Ids handed out, in order, by the next creates before falling back to
    /// generated ones.
    pub fn queue_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock_state()
            .queued_ids
            .extend(ids.into_iter().map(Into::into));
    }

    /// Inserts a document directly, bypassing failure injection.
    pub fn seed(&self, collection: &str, id: &str, fields: Fields) {
        self.lock_state()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.to_string(),
                fields,
            });
    }

    /// Reads a document directly, bypassing failure injection.
    pub fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.lock_state()
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.lock_state()
            .collections
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn unavailable(op: StoreOp) -> BlogError {
    match op {
        StoreOp::List => BlogError::fetch("Document store unavailable"),
        _ => BlogError::persist("Document store unavailable"),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        let state = self.lock_state();
        if state.failing.contains(&StoreOp::List) {
            return Err(unavailable(StoreOp::List));
        }
        Ok(state.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String> {
        let mut state = self.lock_state();
        if state.failing.contains(&StoreOp::Create) {
            return Err(unavailable(StoreOp::Create));
        }
        let id = state
            .queued_ids
            .pop_front()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        tracing::debug!("[DocumentStore] Created {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut state = self.lock_state();
        if state.failing.contains(&StoreOp::Update) {
            return Err(unavailable(StoreOp::Update));
        }
        let document = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| BlogError::not_found("document", id))?;
        document.fields.extend(fields);
        tracing::debug!("[DocumentStore] Updated {}/{}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut state = self.lock_state();
        if state.failing.contains(&StoreOp::Delete) {
            return Err(unavailable(StoreOp::Delete));
        }
        let docs = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| BlogError::not_found("document", id))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(BlogError::not_found("document", id));
        }
        tracing::debug!("[DocumentStore] Deleted {}/{}", collection, id);
        Ok(())
    }
}
