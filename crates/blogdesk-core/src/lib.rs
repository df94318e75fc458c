//! Client core for BlogDesk.
//!
//! Holds the session state machine that decides which views are reachable and
//! the local post collection kept consistent with the remote document store.
//! Both external collaborators (identity provider, document store) are
//! injected as capability traits.

pub mod account;
pub mod config;
pub mod error;
pub mod guard;
pub mod post;
pub mod session;

#[cfg(test)]
mod test_support;

// Re-export common error type
pub use error::{BlogError, ErrorKind};

pub use config::ClientConfig;
pub use guard::{Frame, Navigator, RedirectGate, RouteGuard};
pub use post::{ContentStore, DocumentStore, Post, PostDraft};
pub use session::{Identity, IdentityProvider, Session, SessionMonitor, SessionStatus};
