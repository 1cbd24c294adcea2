//! HTTP server module.
//!
//! The server includes:
//! - Bind-then-announce startup (stdout banner once the socket is listening)
//! - Graceful shutdown on SIGTERM/SIGINT with a bounded drain period

mod server;
mod shutdown;

pub use server::{bind, start_server, Listening};
pub use shutdown::shutdown_signal;
