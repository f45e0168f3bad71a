//! Line-delimited JSON-RPC 2.0 transport over stdin/stdout.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::protocol::{
    error_codes, CallToolParams, JsonRpcRequest, JsonRpcResponse, ToolResultBody,
    JSONRPC_VERSION, PROTOCOL_VERSION, SERVER_NAME,
};
use crate::router::ToolRouter;

#[derive(Debug)]
pub struct StdioServer {
    router: ToolRouter,
}

impl StdioServer {
    pub fn new(router: ToolRouter) -> Self {
        Self { router }
    }

    /// Serve requests until `reader` reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(server = SERVER_NAME, "stdio transport ready");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw line; `None` means nothing is sent back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "unparseable JSON-RPC message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "invalid JSON-RPC request");
                return Some(JsonRpcResponse::failure(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "notification");
            return None;
        }
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {:?}", request.jsonrpc),
            ));
        }

        Some(self.handle_request(id, request).await)
    }

    async fn handle_request(&self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "request");
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!({ "tools": self.router.list_tools() }),
            ),
            "tools/call" => {
                let params: CallToolParams = match serde_json::from_value(request.params) {
                    Ok(params) => params,
                    Err(e) => {
                        return JsonRpcResponse::failure(
                            id,
                            error_codes::INVALID_PARAMS,
                            format!("Invalid params: {}", e),
                        )
                    }
                };
                let text = self.router.call_tool(&params.name, params.arguments).await;
                match serde_json::to_value(ToolResultBody::text(text)) {
                    Ok(body) => JsonRpcResponse::success(id, body),
                    Err(e) => JsonRpcResponse::failure(
                        id,
                        error_codes::INTERNAL_ERROR,
                        format!("Internal error: {}", e),
                    ),
                }
            }
            other => JsonRpcResponse::failure(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }
}
