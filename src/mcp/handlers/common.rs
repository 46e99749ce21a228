use crate::mcp::{McpCallResponse, McpContent};
use crate::tools::canlii::{CanliiError, DateFilters, Language};
use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

pub type HandlerResult = Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)>;

pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn required_str<'a>(
    arguments: &'a Value,
    key: &str,
) -> Result<&'a str, (StatusCode, Json<ErrorResponse>)> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad_request(format!("Missing required parameter: {}", key)))
}

pub fn required_u64(arguments: &Value, key: &str) -> Result<u64, (StatusCode, Json<ErrorResponse>)> {
    arguments
        .get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| bad_request(format!("Missing or invalid parameter: {} (expected a non-negative integer)", key)))
}

pub fn parse_language(arguments: &Value) -> Result<Language, (StatusCode, Json<ErrorResponse>)> {
    let raw = required_str(arguments, "language")?;
    Language::parse_str(raw)
        .ok_or_else(|| bad_request("Invalid language. Allowed values: en, fr"))
}

pub fn parse_date_filters(arguments: &Value) -> DateFilters {
    DateFilters::from_arguments(arguments)
}

fn text_response(text: String, is_error: bool) -> Json<McpCallResponse> {
    Json(McpCallResponse {
        content: vec![McpContent {
            content_type: "text".to_string(),
            text,
        }],
        is_error,
    })
}

/// Pretty-printed JSON as the single text item of a successful call.
pub fn success_json<T: Serialize>(value: &T) -> HandlerResult {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to serialize response: {}", e),
            }),
        )
    })?;
    Ok(text_response(text, false))
}

/// A failed call reported in-band, the way MCP tools surface upstream errors.
pub fn error_text(message: impl Into<String>) -> HandlerResult {
    Ok(text_response(message.into(), true))
}

pub fn canlii_result<T: Serialize>(tool: &str, result: Result<T, CanliiError>) -> HandlerResult {
    match result {
        Ok(value) => success_json(&value),
        Err(e) => {
            error!("{} failed: {}", tool, e);
            error_text(format!("Error: {}", e))
        }
    }
}
