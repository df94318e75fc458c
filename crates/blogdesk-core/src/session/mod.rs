//! Session domain module.
//!
//! This module contains the session model, the identity-provider capability
//! and the monitor that mirrors provider notifications into a session value.
//!
//! # Module Structure
//!
//! - `model`: Session and identity types (`Session`, `SessionStatus`, `Identity`)
//! - `provider`: Identity provider trait and listener registration
//! - `monitor`: Session tracking (`SessionMonitor`, `SessionSubscription`)

mod model;
mod monitor;
mod provider;

// Re-export public API
pub use model::{Identity, Session, SessionStatus};
pub use monitor::{SessionMonitor, SessionSubscription};
pub use provider::{IdentityProvider, ListenerRegistration, SessionListener, SignUpProfile};
