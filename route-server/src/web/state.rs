//! Application state for the web layer.

use std::sync::Arc;

use crate::mcp::McpServer;
use crate::routing::RouteService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Routing and lookup operations
    pub service: Arc<RouteService>,

    /// MCP dispatcher for `POST /mcp`, over the same service
    pub mcp: McpServer,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: RouteService) -> Self {
        let service = Arc::new(service);
        Self {
            mcp: McpServer::new(service.clone()),
            service,
        }
    }
}
