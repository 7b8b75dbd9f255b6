//! Web layer for the route server.
//!
//! Provides HTTP endpoints for each routing mode, geocoding, keyword search
//! and the MCP JSON-RPC transport.

mod routes;
mod state;

pub use routes::{AppError, create_router};
pub use state::AppState;
