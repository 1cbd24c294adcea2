//! Dashboard backend liveness server.
//!
//! Exposes `GET /health` returning `{"status":"ok"}` so orchestration and
//! monitoring tooling can check that the process is up.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routes;

pub use error::{AppError, ConfigError, ServerError};
pub use routes::create_router;
