use super::http::call_tool_inner;
use super::tooling::{schema_to_object_map, tool_catalog};
use crate::core::config::load_config;
use crate::mcp::McpCallResponse;
use crate::types::ErrorResponse;
use crate::AppState;
use axum::http::StatusCode;
use axum::response::Json;
use rmcp::{model::*, ServiceExt};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Tool-level failures stay in-band; only argument and dispatch problems
/// become JSON-RPC errors.
fn to_stdio_result(
    result: Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)>,
) -> Result<CallToolResult, ErrorData> {
    let (status, Json(err)) = match result {
        Ok(Json(response)) => {
            let content = response.content.into_iter().map(|item| Content::text(item.text)).collect();
            return Ok(if response.is_error {
                CallToolResult::error(content)
            } else {
                CallToolResult::success(content)
            });
        }
        Err(failure) => failure,
    };
    let code = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::INVALID_PARAMS,
        StatusCode::NOT_FOUND => ErrorCode::METHOD_NOT_FOUND,
        _ => ErrorCode::INTERNAL_ERROR,
    };
    Err(ErrorData::new(code, err.error, None))
}

#[derive(Clone, Debug)]
pub struct McpService {
    pub state: Arc<AppState>,
}

impl McpService {
    pub fn new() -> anyhow::Result<Self> {
        info!("Starting CanLII MCP service");
        let state = AppState::new(load_config())?;
        Ok(Self::with_state(Arc::new(state)))
    }

    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl rmcp::ServerHandler for McpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::LATEST)
            .with_server_info(
                Implementation::from_build_env()
                    .with_title("CanLII MCP")
                    .with_description(
                        "CanLII legal database tools (case law, legislation, citator) plus a web page text extractor. When using scrape_website, always cite the source URL in your response for attribution and verification.",
                    ),
            )
            .with_instructions(
                "Use the CanLII tools to find Canadian courts, decisions, citations and legislation. Content returned by scrape_website must always be presented together with its sourceUrl.",
            )
    }

    async fn list_tools(
        &self,
        _page: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = tool_catalog()
            .into_iter()
            .map(|entry| {
                Tool::new(
                    entry.name,
                    entry.description,
                    schema_to_object_map(&entry.input_schema),
                )
                .with_title(entry.title)
            })
            .collect();

        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("MCP tool call: {}", request.name);

        // Handlers take a serde_json::Value; a missing arguments object is an
        // empty one so each tool reports its own missing parameters.
        let arguments = Value::Object(request.arguments.clone().unwrap_or_else(Map::new));

        to_stdio_result(
            call_tool_inner(Arc::clone(&self.state), request.name.as_ref(), &arguments).await,
        )
    }
}

pub async fn run() -> anyhow::Result<()> {
    let service = McpService::new()?;
    let running = service.serve(rmcp::transport::stdio()).await?;
    info!("MCP stdio server initialized; waiting for client session");
    let quit_reason = running.waiting().await?;
    warn!("MCP stdio server stopped: {:?}", quit_reason);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::McpContent;

    #[test]
    fn in_band_errors_stay_tool_results() {
        let result = to_stdio_result(Ok(Json(McpCallResponse {
            content: vec![McpContent {
                content_type: "text".to_string(),
                text: "Error scraping website: Not found".to_string(),
            }],
            is_error: true,
        })))
        .unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn bad_arguments_map_to_invalid_params() {
        let err = to_stdio_result(Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing required parameter: language".to_string(),
            }),
        )))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Missing required parameter: language");
    }

    #[test]
    fn unknown_tool_maps_to_method_not_found() {
        let err = to_stdio_result(Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Unknown tool: nope".to_string(),
            }),
        )))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
    }
}
