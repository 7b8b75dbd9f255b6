//! MCP request dispatch and the stdio transport.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::routing::RouteService;

use super::protocol::{
    CallToolParams, INTERNAL_ERROR, INVALID_REQUEST, JSONRPC_VERSION, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use super::tools;

/// MCP server over a shared [`RouteService`].
#[derive(Debug, Clone)]
pub struct McpServer {
    service: Arc<RouteService>,
}

impl McpServer {
    pub fn new(service: Arc<RouteService>) -> Self {
        Self { service }
    }

    /// Handle one raw message: a request, a notification or a batch.
    ///
    /// Returns `None` when nothing should be sent back.
    pub async fn handle_message(&self, raw: &[u8]) -> Option<Value> {
        match serde_json::from_slice::<Value>(raw) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => {
                warn!(error = %e, "unparseable MCP message");
                let error = JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}"));
                to_value(&JsonRpcResponse::error(None, error))
            }
        }
    }

    /// Handle an already-parsed message.
    pub async fn handle_value(&self, value: Value) -> Option<Value> {
        match value {
            Value::Array(batch) if batch.is_empty() => {
                let error = JsonRpcError::new(INVALID_REQUEST, "Invalid Request: empty batch");
                to_value(&JsonRpcResponse::error(None, error))
            }
            Value::Array(batch) => {
                let mut responses = Vec::with_capacity(batch.len());
                for item in batch {
                    if let Some(response) = self.handle_single(item).await {
                        responses.push(response);
                    }
                }
                if responses.is_empty() {
                    None
                } else {
                    to_value(&responses)
                }
            }
            single => self
                .handle_single(single)
                .await
                .and_then(|response| to_value(&response)),
        }
    }

    async fn handle_single(&self, value: Value) -> Option<JsonRpcResponse> {
        let id = value.get("id").cloned().filter(|id| !id.is_null());

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                let error = JsonRpcError::new(INVALID_REQUEST, format!("Invalid Request: {e}"));
                return Some(JsonRpcResponse::error(id, error));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let error = JsonRpcError::new(INVALID_REQUEST, "Invalid Request: jsonrpc must be \"2.0\"");
            return Some(JsonRpcResponse::error(request.id, error));
        }

        if request.is_notification() {
            debug!(method = %request.method, "MCP notification");
            return None;
        }

        Some(self.handle_request(request).await)
    }

    /// Dispatch one request that expects a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "MCP request");

        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                request.id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            ),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                request.id,
                json!({"tools": tools::definitions()}),
            ),
            "tools/call" => {
                let params: CallToolParams = match serde_json::from_value(request.params) {
                    Ok(params) => params,
                    Err(e) => {
                        return JsonRpcResponse::error(
                            request.id,
                            JsonRpcError::invalid_params(format!("Invalid params: {e}")),
                        );
                    }
                };
                let arguments = params.arguments.unwrap_or(Value::Null);
                match tools::call_tool(&self.service, &params.name, arguments).await {
                    Ok(result) => match serde_json::to_value(&result) {
                        Ok(result) => JsonRpcResponse::success(request.id, result),
                        Err(e) => JsonRpcResponse::error(
                            request.id,
                            JsonRpcError::new(INTERNAL_ERROR, e.to_string()),
                        ),
                    },
                    Err(error) => JsonRpcResponse::error(request.id, error),
                }
            }
            other => JsonRpcResponse::error(
                request.id,
                JsonRpcError::new(METHOD_NOT_FOUND, format!("Method not found: {other}")),
            ),
        }
    }

    /// Serve MCP over stdin/stdout, one JSON message per line, until stdin
    /// closes.
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        info!("MCP server listening on stdio");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(line.as_bytes()).await {
                let mut out = response.to_string();
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, MCP server exiting");
        Ok(())
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "failed to serialize MCP response");
            None
        }
    }
}
