use crate::scraping::error::ScrapeError;
use crate::scraping::Scraper;
use crate::types::{ScrapeRequest, ScrapeWebsiteResponse, CITATION_NOTE};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

fn into_response(source_url: String, content: String) -> ScrapeWebsiteResponse {
    ScrapeWebsiteResponse {
        source_url,
        content,
        scraped_at: Utc::now().to_rfc3339(),
        note: CITATION_NOTE.to_string(),
    }
}

/// `scrape_website` from raw tool arguments. `sourceUrl` echoes the URL the
/// caller passed, not where redirects ended up.
pub async fn scrape_website(
    scraper: &Scraper,
    arguments: &Value,
) -> Result<ScrapeWebsiteResponse, ScrapeError> {
    let scraped = scraper.scrape_arguments(arguments).await?;
    let source_url = arguments
        .get("url")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| scraped.final_url.to_string());
    if scraped.final_url.as_str() != source_url {
        info!("{} resolved to {}", source_url, scraped.final_url);
    }
    Ok(into_response(source_url, scraped.text))
}

pub async fn scrape_request(
    scraper: &Scraper,
    request: &ScrapeRequest,
) -> Result<ScrapeWebsiteResponse, ScrapeError> {
    let scraped = scraper.scrape(request).await?;
    Ok(into_response(request.url.clone(), scraped.text))
}
