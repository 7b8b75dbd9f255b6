//! Model Context Protocol tool server.
//!
//! Exposes the route service as MCP tools over JSON-RPC 2.0. The stdio
//! transport lives in [`McpServer::run_stdio`]; the HTTP transport is the
//! `POST /mcp` route in [`crate::web`].

pub mod protocol;
mod server;
mod tools;

pub use server::McpServer;
pub use tools::definitions;
