use thiserror::Error;

/// Everything `scrape_website` can report back to a caller.
///
/// Session failures never show up here; they are logged and the fetch
/// proceeds without cookies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("Invalid request: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Access denied (403): the site may be blocking automated requests. Try again later.")]
    AccessDenied,

    #[error("Rate limited (429): too many requests. Please wait before trying again.")]
    RateLimited,

    #[error("Not found (404): the requested URL does not exist.")]
    NotFound,

    #[error("Failed to fetch: {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("No text content found on the page")]
    NoContent,

    #[error("Failed to fetch after all retries")]
    RetriesExhausted,
}

impl ScrapeError {
    /// Whether another attempt may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScrapeError::AccessDenied
                | ScrapeError::RateLimited
                | ScrapeError::Http { .. }
                | ScrapeError::Transport(_)
        )
    }
}
