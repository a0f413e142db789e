//! REST API module
//!
//! Exposes the interview services over HTTP with axum.

use std::sync::Arc;

use crate::services::ServiceContext;

pub mod handlers;
pub mod routing;
pub mod startup;
pub mod types;

/// Shared handler state
pub type AppState = Arc<ServiceContext>;

pub use routing::create_router;
pub use startup::start_server;
