//! Route admission for protected views.
//!
//! # Module Structure
//!
//! - `route_guard`: Per-view admission (`RouteGuard`, `Frame`, `Navigator`)
//! - `redirect_gate`: One entry-view redirect per session transition (`RedirectGate`)

mod redirect_gate;
mod route_guard;

// Re-export public API
pub use redirect_gate::RedirectGate;
pub use route_guard::{Frame, Navigator, RouteGuard};
