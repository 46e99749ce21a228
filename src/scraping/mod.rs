pub mod error;
pub mod extract;
pub mod redirect;
pub mod retry;
pub mod tags;
pub mod transport;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

use crate::antibot::get_browser_headers;
use crate::session_store::SessionContext;
use crate::types::ScrapeRequest;
use error::ScrapeError;
use redirect::{fetch_with_redirects, FetchAttempt};
use retry::RetryPolicy;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use transport::{FetchedPage, HttpTransport};
use url::Url;
use validate::{validate_arguments, validate_request, ValidatedRequest};

/// Text pulled from a page, plus where the redirect chain ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedText {
    pub text: String,
    pub final_url: Url,
}

/// What one attempt of the retry loop amounts to.
enum AttemptOutcome {
    Success(FetchedPage),
    Terminal(ScrapeError),
    Retry {
        error: ScrapeError,
        extra_delay: Duration,
    },
}

/// Resilient text extraction: validate, establish a session when the target
/// needs one, fetch with bounded retries and redirects, then extract.
#[derive(Clone)]
pub struct Scraper {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionContext>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Scraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scraper")
            .field("session_origin", &self.session.origin().as_str())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Scraper {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: Arc<SessionContext>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            session,
            policy,
        }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Scrape from raw tool arguments (`url`, `excludeTags`, `includeTags`,
    /// `maxRedirects`, `userAgent`).
    pub async fn scrape_arguments(&self, arguments: &Value) -> Result<ScrapedText, ScrapeError> {
        let request = validate_arguments(arguments).map_err(ScrapeError::Validation)?;
        self.scrape_validated(&request).await
    }

    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapedText, ScrapeError> {
        let request = validate_request(request).map_err(ScrapeError::Validation)?;
        self.scrape_validated(&request).await
    }

    pub async fn scrape_validated(
        &self,
        request: &ValidatedRequest,
    ) -> Result<ScrapedText, ScrapeError> {
        info!("Scraping URL: {}", request.url);

        self.session
            .ensure_session(self.transport.as_ref(), &request.url, self.policy.redirect_delay())
            .await;

        let page = self.fetch_with_retries(request).await?;
        let text = extract::extract_text(
            &page.body,
            request.exclude_tags.as_deref(),
            request.include_tags.as_deref(),
        )?;

        info!("Extracted {} chars from {}", text.len(), page.url);
        Ok(ScrapedText {
            text,
            final_url: page.url,
        })
    }

    async fn fetch_with_retries(&self, request: &ValidatedRequest) -> Result<FetchedPage, ScrapeError> {
        let headers = get_browser_headers(
            request.user_agent.as_deref(),
            self.session.origin().as_str(),
        );
        let max_attempts = self.policy.attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            tokio::time::sleep(self.policy.attempt_delay(attempt)).await;
            info!("Attempt {}/{} for URL: {}", attempt, max_attempts, request.url);

            let result = fetch_with_redirects(
                self.transport.as_ref(),
                &self.session,
                &request.url,
                &headers,
                request.max_redirects,
                self.policy.redirect_delay(),
            )
            .await;

            match self.classify(result, attempt) {
                AttemptOutcome::Success(page) => return Ok(page),
                AttemptOutcome::Terminal(error) => {
                    warn!("Attempt {} failed permanently: {}", attempt, error);
                    return Err(error);
                }
                AttemptOutcome::Retry { error, extra_delay } => {
                    warn!("Attempt {} failed: {}", attempt, error);
                    if attempt == max_attempts {
                        return Err(error);
                    }
                    last_error = Some(error);
                    if !extra_delay.is_zero() {
                        tokio::time::sleep(extra_delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or(ScrapeError::RetriesExhausted))
    }

    fn classify(&self, result: anyhow::Result<FetchAttempt>, attempt: u32) -> AttemptOutcome {
        let (error, extra_delay) = match result {
            Ok(fetched) if fetched.response.status.is_success() => {
                return AttemptOutcome::Success(fetched.response)
            }
            Ok(fetched) => {
                let status = fetched.response.status;
                match status.as_u16() {
                    404 => (ScrapeError::NotFound, Duration::ZERO),
                    403 => (ScrapeError::AccessDenied, Duration::ZERO),
                    429 => (ScrapeError::RateLimited, self.policy.rate_limit_delay(attempt)),
                    code => (
                        ScrapeError::Http {
                            status: code,
                            reason: status.canonical_reason().unwrap_or("").to_string(),
                        },
                        Duration::ZERO,
                    ),
                }
            }
            Err(e) => (
                ScrapeError::Transport(format!("{:#}", e)),
                self.policy.transport_error_delay(attempt),
            ),
        };

        if error.is_retryable() {
            AttemptOutcome::Retry { error, extra_delay }
        } else {
            AttemptOutcome::Terminal(error)
        }
    }
}
