//! Session cookie continuity for the one site that needs it.
//!
//! CanLII's public pages answer anonymous clients more reliably once they
//! carry the cookies handed out by the site root. The first scrape aimed at
//! that host GETs the root, following redirects. If the chain ends in a 2xx,
//! the `name=value` part of every `Set-Cookie` seen along it is kept, and
//! every later request to the same host replays them in a `Cookie` header.
//!
//! The context is constructed once at startup and shared through `AppState`.
//! Two requests racing to establish the session both write; the last write
//! wins and the only cost is one redundant round trip.

use crate::antibot::get_browser_headers;
use crate::scraping::redirect::fetch_with_redirects;
use crate::scraping::transport::HttpTransport;
use crate::scraping::validate::DEFAULT_MAX_REDIRECTS;
use reqwest::header::{HeaderMap, SET_COOKIE};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug)]
pub struct SessionContext {
    origin: Url,
    base_host: String,
    cookies: RwLock<Vec<String>>,
}

impl SessionContext {
    pub fn new(origin: Url) -> Self {
        let base_host = origin
            .host_str()
            .map(|h| h.trim_start_matches("www.").to_ascii_lowercase())
            .unwrap_or_default();
        Self {
            origin,
            base_host,
            cookies: RwLock::new(Vec::new()),
        }
    }

    pub fn from_origin(origin: &str) -> anyhow::Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| anyhow::anyhow!("Invalid session origin '{}': {}", origin, e))?;
        Ok(Self::new(origin))
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Root of the origin; the URL hit to establish the session.
    pub fn root_url(&self) -> Url {
        let mut root = self.origin.clone();
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);
        root
    }

    /// True when `url` targets the session host or one of its subdomains.
    pub fn applies_to(&self, url: &Url) -> bool {
        if self.base_host.is_empty() {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        host == self.base_host || host.ends_with(&format!(".{}", self.base_host))
    }

    pub fn has_cookies(&self) -> bool {
        !self
            .cookies
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }

    /// `Cookie` header value for `url`, if the session covers it and holds cookies.
    pub fn cookie_header_for(&self, url: &Url) -> Option<String> {
        if !self.applies_to(url) {
            return None;
        }
        let cookies = self.cookies.read().unwrap_or_else(|e| e.into_inner());
        if cookies.is_empty() {
            None
        } else {
            Some(cookies.join("; "))
        }
    }

    pub fn store(&self, cookies: Vec<String>) {
        *self.cookies.write().unwrap_or_else(|e| e.into_inner()) = cookies;
    }

    /// Establish the session if `url` needs one and none exists yet.
    ///
    /// Never fails: an unreachable or unhappy site root means scraping
    /// continues without cookies, and the next scrape tries again.
    pub async fn ensure_session(
        &self,
        transport: &dyn HttpTransport,
        url: &Url,
        redirect_delay: Duration,
    ) {
        if !self.applies_to(url) || self.has_cookies() {
            return;
        }

        let root = self.root_url();
        info!("Establishing session with {}", root);
        let headers = get_browser_headers(None, self.origin.as_str());

        let attempt = match fetch_with_redirects(
            transport,
            self,
            &root,
            &headers,
            DEFAULT_MAX_REDIRECTS,
            redirect_delay,
        )
        .await
        {
            Ok(attempt) => attempt,
            Err(e) => {
                warn!("Failed to establish session with {}: {:#}", root, e);
                return;
            }
        };

        let status = attempt.response.status;
        if !status.is_success() {
            warn!("Session root {} answered {}; continuing without cookies", root, status);
            return;
        }
        if attempt.set_cookies.is_empty() {
            debug!("Session root answered {} without Set-Cookie; continuing cookie-less", status);
            return;
        }
        info!(
            "Session established ({} cookies, {} redirects)",
            attempt.set_cookies.len(),
            attempt.redirects_followed()
        );
        self.store(attempt.set_cookies);
    }
}

/// `name=value` pairs from every `Set-Cookie` header, attributes dropped.
pub fn cookie_pairs(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('=') && !pair.starts_with('='))
        .map(str::to_string)
        .collect()
}

/// Fold `incoming` pairs into `into`; a cookie set again replaces its earlier value.
pub fn merge_cookie_pairs(into: &mut Vec<String>, incoming: Vec<String>) {
    for pair in incoming {
        let name = pair.split('=').next().unwrap_or_default().to_string();
        match into
            .iter_mut()
            .find(|existing| existing.split('=').next() == Some(name.as_str()))
        {
            Some(existing) => *existing = pair,
            None => into.push(pair),
        }
    }
}
