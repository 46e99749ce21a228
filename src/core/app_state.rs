use crate::core::config::CanliiConfig;
use crate::scraping::transport::ReqwestTransport;
use crate::scraping::Scraper;
use crate::session_store::SessionContext;
use crate::tools::canlii::CanliiClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    /// Resilient text fetcher; owns the process-wide session context.
    pub scraper: Arc<Scraper>,
    pub canlii: Arc<CanliiClient>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("scraper", &self.scraper)
            .field("canlii", &self.canlii)
            .finish()
    }
}

impl AppState {
    /// Build the shared clients from config. The API client and the scraper
    /// use separate reqwest clients because the scraper must not follow
    /// redirects on its own.
    pub fn new(config: CanliiConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.resolve_http_timeout_secs());
        let connect_timeout = Duration::from_secs(config.resolve_connect_timeout_secs());

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!("CANLII_API not set; CanLII API tools will return errors until a key is configured");
        }
        let canlii = CanliiClient::new(http_client, &config.resolve_api_base_url(), api_key)?;

        let session = SessionContext::from_origin(&config.resolve_session_origin())?;
        let transport = ReqwestTransport::new(timeout, connect_timeout)?;
        let scraper = Scraper::new(Arc::new(transport), Arc::new(session), config.retry);

        info!(
            "CanLII API at {}; session origin {}; {} scrape attempts",
            config.resolve_api_base_url(),
            scraper.session().origin(),
            scraper.policy().attempts()
        );

        Ok(Self {
            scraper: Arc::new(scraper),
            canlii: Arc::new(canlii),
        })
    }

    pub fn with_canlii(mut self, canlii: CanliiClient) -> Self {
        self.canlii = Arc::new(canlii);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_explicit_config() {
        let config = CanliiConfig {
            api_key: Some("k".to_string()),
            api_base_url: Some("http://127.0.0.1:1/v1".to_string()),
            session_origin: Some("https://www.canlii.org/".to_string()),
            ..Default::default()
        };
        let state = AppState::new(config).unwrap();
        assert!(state.canlii.has_api_key());
        assert_eq!(state.scraper.session().origin().as_str(), "https://www.canlii.org/");
        assert_eq!(state.scraper.policy().max_attempts, 3);
    }

    #[test]
    fn bad_session_origin_is_a_startup_error() {
        let config = CanliiConfig {
            session_origin: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(AppState::new(config).is_err());
    }
}
