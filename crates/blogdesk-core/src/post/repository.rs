//! Document store capability.
//!
//! Defines the interface for the remote document database holding posts.

use super::model::{Document, Fields};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract remote document store.
///
/// This trait decouples the content store from the concrete backend. Writes
/// become visible to `list_all` eventually; timeouts are the implementation's
/// concern.
///
/// # Implementation Notes
///
/// Implementations should report:
/// - transport/provider failures on list as `BlogError::Fetch`
/// - transport/provider failures on writes as `BlogError::Persist`
/// - absent ids on update/delete as `BlogError::NotFound`
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists every document in a collection.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection name
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Creates a document and returns its assigned id.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection name
    /// * `fields` - Field values of the new document
    async fn create(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Merges `fields` into an existing document.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection name
    /// * `id` - The id of the document to update
    /// * `fields` - Field values to overwrite; other fields are kept
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Deletes a document.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection name
    /// * `id` - The id of the document to delete
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}
