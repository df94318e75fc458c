//! Post domain module.
//!
//! # Module Structure
//!
//! - `model`: Post, draft and document types
//! - `repository`: Document store capability trait
//! - `store`: Local content collection (`ContentStore`)

mod model;
mod repository;
mod store;

// Re-export public API
pub use model::{Document, Fields, Post, PostDraft};
pub use repository::DocumentStore;
pub use store::ContentStore;
