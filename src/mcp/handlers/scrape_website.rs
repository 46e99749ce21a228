use super::common::{error_text, success_json, HandlerResult};
use crate::tools::scrape;
use crate::AppState;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

pub async fn handle(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    match scrape::scrape_website(&state.scraper, arguments).await {
        Ok(response) => success_json(&response),
        Err(e) => {
            error!("scrape_website failed: {}", e);
            error_text(format!("Error scraping website: {}", e))
        }
    }
}
