use super::model::{Post, PostDraft};
use super::repository::DocumentStore;
use crate::error::{BlogError, Result};
use crate::session::{Identity, SessionMonitor};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Local mirror of the remote post collection.
///
/// `ContentStore` owns the content collection exclusively. Every mutation is
/// write-through: the remote call runs first and the local collection only
/// changes once the store has confirmed it, so a failed call never leaves a
/// partial write behind.
///
/// Calls that resolve after [`ContentStore::deactivate`] still report their
/// outcome but leave the collection alone. A fetch started during an earlier
/// activation is discarded even if the view has been activated again since.
pub struct ContentStore {
    /// Remote document store capability
    documents: Arc<dyn DocumentStore>,
    /// Session source for gated operations
    session: Arc<SessionMonitor>,
    /// Collection name in the document store
    collection: String,
    /// Posts in creation order
    posts: RwLock<Vec<Post>>,
    /// Whether the owning view is still mounted
    mounted: AtomicBool,
    /// Bumped on every activate and deactivate
    epoch: AtomicU64,
}

impl ContentStore {
    /// Creates an empty, mounted content store.
    ///
    /// # Arguments
    ///
    /// * `documents` - The remote document store
    /// * `session` - Monitor providing the current session
    /// * `collection` - Collection name holding the posts
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        session: Arc<SessionMonitor>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            session,
            collection: collection.into(),
            posts: RwLock::new(Vec::new()),
            mounted: AtomicBool::new(true),
            epoch: AtomicU64::new(0),
        }
    }

    /// Marks the owning view mounted and populates the collection.
    pub async fn activate(&self) -> Result<usize> {
        self.mounted.store(true, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.load_all().await
    }

    /// Marks the owning view torn down. In-flight calls resolving later
    /// will not touch the collection.
    pub fn deactivate(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns a snapshot of the collection for rendering.
    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    /// Returns the post with the given id, if held locally.
    pub async fn get(&self, id: &str) -> Option<Post> {
        self.posts.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    /// Replaces the collection with the full remote set.
    ///
    /// Documents that do not decode as posts are skipped, as are repeated ids.
    ///
    /// # Returns
    ///
    /// The number of posts now held.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Fetch` on transport or provider failure; the
    /// previous collection is kept untouched.
    pub async fn load_all(&self) -> Result<usize> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let documents = self
            .documents
            .list_all(&self.collection)
            .await
            .map_err(|e| {
                tracing::warn!("[ContentStore] Failed to fetch '{}': {}", self.collection, e);
                into_fetch(e)
            })?;

        let mut loaded: Vec<Post> = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document.id.clone();
            match Post::from_document(document) {
                Ok(post) if loaded.iter().any(|p| p.id == post.id) => {
                    tracing::warn!("[ContentStore] Skipping duplicate document id: {}", id);
                }
                Ok(post) => loaded.push(post),
                Err(e) => {
                    tracing::warn!("[ContentStore] Skipping malformed document {}: {}", id, e);
                }
            }
        }

        let count = loaded.len();
        let mut posts = self.posts.write().await;
        if !self.is_mounted() || self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("[ContentStore] Stale fetch, discarding {} posts", count);
            return Ok(count);
        }

        *posts = loaded;
        tracing::info!("[ContentStore] Loaded {} posts from '{}'", count, self.collection);
        Ok(count)
    }

    /// Creates a post owned by the signed-in user and appends it.
    ///
    /// # Errors
    ///
    /// - `BlogError::Validation` if a field is empty (no remote call)
    /// - `BlogError::Auth` if no user is signed in (no remote call)
    /// - `BlogError::Persist` if the remote create fails
    pub async fn create(&self, draft: PostDraft) -> Result<Post> {
        draft.validate()?;
        let identity = self.require_identity()?;

        let created_at = Utc::now();
        let fields = draft.to_create_fields(&identity.uid, created_at);
        let id = self
            .documents
            .create(&self.collection, fields)
            .await
            .map_err(|e| {
                tracing::warn!("[ContentStore] Failed to create post: {}", e);
                into_persist(e)
            })?;

        let post = draft.into_post(id, identity.uid, created_at);
        if !self.is_mounted() {
            tracing::debug!("[ContentStore] View torn down, not appending post {}", post.id);
            return Ok(post);
        }

        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post.clone(),
            None => posts.push(post.clone()),
        }
        tracing::info!("[ContentStore] Created post {}", post.id);
        Ok(post)
    }

    /// Updates title, author and content of a post in place.
    ///
    /// `id`, owner and creation time are never sent to the store.
    ///
    /// # Errors
    ///
    /// - `BlogError::Validation` if a field is empty (no remote call)
    /// - `BlogError::NotFound` if the post is not held locally (no remote call)
    ///   or the store reports it absent
    /// - `BlogError::Persist` if the remote update fails
    pub async fn update(&self, id: &str, draft: PostDraft) -> Result<()> {
        draft.validate()?;
        self.require_local(id).await?;

        self.documents
            .update(&self.collection, id, draft.to_update_fields())
            .await
            .map_err(|e| {
                tracing::warn!("[ContentStore] Failed to update post {}: {}", id, e);
                into_persist(e)
            })?;

        if !self.is_mounted() {
            tracing::debug!("[ContentStore] View torn down, not applying update to {}", id);
            return Ok(());
        }

        let mut posts = self.posts.write().await;
        if let Some(post) = posts.iter_mut().find(|p| p.id == id) {
            post.apply(&draft);
        }
        tracing::info!("[ContentStore] Updated post {}", id);
        Ok(())
    }

    /// Deletes a post.
    ///
    /// # Errors
    ///
    /// - `BlogError::NotFound` if the post is not held locally (no remote call)
    ///   or the store reports it absent
    /// - `BlogError::Persist` if the remote delete fails
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.require_local(id).await?;

        self.documents
            .delete(&self.collection, id)
            .await
            .map_err(|e| {
                tracing::warn!("[ContentStore] Failed to delete post {}: {}", id, e);
                into_persist(e)
            })?;

        if !self.is_mounted() {
            tracing::debug!("[ContentStore] View torn down, not removing {}", id);
            return Ok(());
        }

        self.posts.write().await.retain(|p| p.id != id);
        tracing::info!("[ContentStore] Deleted post {}", id);
        Ok(())
    }

    fn require_identity(&self) -> Result<Identity> {
        self.session
            .current()
            .identity()
            .cloned()
            .ok_or_else(|| BlogError::auth("User not authenticated"))
    }

    async fn require_local(&self, id: &str) -> Result<()> {
        if self.posts.read().await.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(BlogError::not_found("post", id))
        }
    }
}

fn into_fetch(err: BlogError) -> BlogError {
    match err {
        BlogError::Fetch(_) => err,
        other => BlogError::fetch(other.to_string()),
    }
}

fn into_persist(err: BlogError) -> BlogError {
    match err {
        BlogError::Persist(_) => err,
        BlogError::NotFound { id, .. } => BlogError::not_found("post", id),
        other => BlogError::persist(other.to_string()),
    }
}
