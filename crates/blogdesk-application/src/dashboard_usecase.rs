//! Dashboard use case implementation.
//!
//! This module provides the `DashboardUseCase` which drives the content store
//! on behalf of the dashboard view and reports every outcome as a notice.

use crate::notice::{Action, Notice, NoticeCallback};
use blogdesk_core::error::{BlogError, Result};
use blogdesk_core::post::{ContentStore, Post, PostDraft};
use std::sync::Arc;

/// Use case behind the dashboard view.
///
/// The view calls `open` once per activation, then one of the mutating
/// operations per submitted form. Controls stay disabled while a call is in
/// flight, so mutations never overlap.
pub struct DashboardUseCase {
    /// Local post collection
    content: Arc<ContentStore>,
    /// Receives a notice for every outcome
    notices: NoticeCallback,
}

impl DashboardUseCase {
    /// Creates a new `DashboardUseCase` instance.
    ///
    /// # Arguments
    ///
    /// * `content` - The content store backing the view
    /// * `notices` - Callback receiving user notices
    pub fn new(content: Arc<ContentStore>, notices: NoticeCallback) -> Self {
        Self { content, notices }
    }

    /// Activates the view and loads every post.
    ///
    /// On fetch failure the previous snapshot stays visible and an error
    /// notice is emitted.
    pub async fn open(&self) -> Result<Vec<Post>> {
        match self.content.activate().await {
            Ok(0) => self.notify(Notice::info("No blogs yet.")),
            Ok(_) => {}
            Err(e) => {
                self.notify(Notice::failed(Action::LoadPosts, &e));
                return Err(e);
            }
        }
        Ok(self.content.posts().await)
    }

    /// Tears the view down; late results no longer touch the collection.
    pub fn close(&self) {
        self.content.deactivate();
    }

    /// Reloads the full collection (user-initiated retry).
    pub async fn refresh(&self) -> Result<Vec<Post>> {
        self.report(Action::LoadPosts, self.content.load_all().await, false)?;
        Ok(self.content.posts().await)
    }

    /// Current snapshot for rendering.
    pub async fn posts(&self) -> Vec<Post> {
        self.content.posts().await
    }

    /// Form values for editing an existing post.
    pub async fn edit_form(&self, id: &str) -> Result<PostDraft> {
        self.content
            .get(id)
            .await
            .map(|post| PostDraft::from(&post))
            .ok_or_else(|| BlogError::not_found("post", id))
    }

    /// Submits the "Add New Blog" form.
    pub async fn publish(&self, draft: PostDraft) -> Result<Post> {
        let result = self.content.create(draft).await;
        self.report(Action::CreatePost, result, true)
    }

    /// Submits the "Edit Blog" form.
    pub async fn edit(&self, id: &str, draft: PostDraft) -> Result<()> {
        let result = self.content.update(id, draft).await;
        self.report(Action::UpdatePost, result, true)
    }

    /// Confirms deletion of a post.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let result = self.content.delete(id).await;
        self.report(Action::DeletePost, result, true)
    }

    fn report<T>(&self, action: Action, result: Result<T>, announce_success: bool) -> Result<T> {
        match &result {
            Ok(_) if announce_success => self.notify(Notice::completed(action)),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("[Dashboard] {:?} failed: {}", action, e);
                self.notify(Notice::failed(action, e));
            }
        }
        result
    }

    fn notify(&self, notice: Notice) {
        (self.notices)(notice);
    }
}
