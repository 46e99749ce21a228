use super::handlers::{self, common::HandlerResult};
use super::tooling::tool_catalog;
use crate::types::*;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpToolsResponse {
    pub tools: Vec<McpTool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallResponse {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

pub async fn list_tools() -> Json<McpToolsResponse> {
    let tools = tool_catalog()
        .into_iter()
        .map(|tool| McpTool {
            name: tool.name.to_string(),
            title: tool.title.to_string(),
            description: tool.description.to_string(),
            input_schema: tool.input_schema,
        })
        .collect();
    Json(McpToolsResponse { tools })
}

/// Route one tool call to its handler. Shared by the HTTP and stdio transports.
pub async fn call_tool_inner(state: Arc<AppState>, name: &str, arguments: &Value) -> HandlerResult {
    match name {
        "scrape_website" => handlers::scrape_website::handle(state, arguments).await,
        "get_courts_and_tribunals" => handlers::case_law::courts_and_tribunals(state, arguments).await,
        "get_case_law_decisions" => handlers::case_law::case_law_decisions(state, arguments).await,
        "get_case_metadata" => handlers::case_law::case_metadata(state, arguments).await,
        "get_case_citator" => handlers::case_law::case_citator(state, arguments).await,
        "get_legislation_databases" => handlers::legislation::legislation_databases(state, arguments).await,
        "browse_legislation" => handlers::legislation::browse_legislation(state, arguments).await,
        "get_legislation_regulation_metadata" => {
            handlers::legislation::legislation_metadata(state, arguments).await
        }
        _ => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown tool: {}", name),
            }),
        )),
    }
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<McpCallRequest>,
) -> HandlerResult {
    info!("MCP tool call: {}", request.name);
    call_tool_inner(state, &request.name, &request.arguments).await
}
