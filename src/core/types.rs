use serde::{Deserialize, Serialize};

/// Reminder attached to every scrape result.
pub const CITATION_NOTE: &str = "Always cite the sourceUrl when presenting this content to users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default)]
    pub exclude_tags: Option<String>,
    #[serde(default)]
    pub include_tags: Option<String>,
    #[serde(default)]
    pub max_redirects: Option<usize>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Successful `scrape_website` payload. `source_url` is the URL the caller
/// asked for and must accompany `content` wherever it is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeWebsiteResponse {
    pub source_url: String,
    pub content: String,
    pub scraped_at: String,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
