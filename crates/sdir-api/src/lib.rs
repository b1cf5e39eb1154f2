//! Axum HTTP API server.
//!
//! This crate provides:
//! - Script analysis into an in-memory session
//! - Prompt editing, text export and per-scene render dispatch
//! - Render settings held in memory
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
