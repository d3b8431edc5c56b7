//! REST API for the LP impermanent-loss estimator.
//!
//! Endpoints:
//! - `GET /health`
//! - `POST /lp/estimate`: IL and fee APR of a pool
//! - `POST /lp/position`: fee earnings of a position
//! - `GET /lp/scenarios`: IL table for standard price moves

/// Prelude module for convenient imports.
pub mod prelude;

/// Environment configuration.
pub mod config;
/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// Route definitions.
pub mod routes;
/// Server startup.
pub mod server;
/// Shared application state.
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use server::ApiServer;
pub use state::AppState;
