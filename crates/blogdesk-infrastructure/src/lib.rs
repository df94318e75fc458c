pub mod config_service;
pub mod memory_document_store;
pub mod memory_identity_provider;

pub use crate::config_service::ConfigService;
pub use crate::memory_document_store::{InMemoryDocumentStore, StoreOp};
pub use crate::memory_identity_provider::InMemoryIdentityProvider;
