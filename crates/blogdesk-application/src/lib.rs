//! Application layer for BlogDesk.
//!
//! This crate provides the use cases the presentation layer calls, coordinating
//! the session monitor, route guards and content store from the core crate
//! with the infrastructure implementations.

pub mod account_usecase;
pub mod bootstrap;
pub mod dashboard_usecase;
pub mod notice;
pub mod tracing_layer;

pub use account_usecase::AccountUseCase;
pub use bootstrap::ClientBootstrap;
pub use dashboard_usecase::DashboardUseCase;
pub use notice::{Action, Notice, NoticeCallback, NoticeLevel};
pub use tracing_layer::{ClientEvent, ClientEventLayer, init_tracing};
