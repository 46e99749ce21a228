use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use tracing::warn;

/// Desktop Chrome on macOS; sent unless the caller supplies its own agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    ),
    ("accept-language", "en-US,en;q=0.9"),
    ("accept-encoding", "gzip, deflate, br"),
    ("dnt", "1"),
    ("connection", "keep-alive"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "cross-site"),
    ("sec-fetch-user", "?1"),
    ("cache-control", "max-age=0"),
];

/// Realistic browser header set. `User-Agent` is the only per-call variable
/// here; `Cookie` is added per hop by the fetcher.
pub fn get_browser_headers(user_agent: Option<&str>, referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(BROWSER_HEADERS.len() + 2);

    let ua = user_agent
        .and_then(|ua| match HeaderValue::from_str(ua) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring user agent with invalid header characters: {:?}", ua);
                None
            }
        })
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(USER_AGENT, ua);

    for (name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if let Ok(referer) = HeaderValue::from_str(referer) {
        headers.insert(reqwest::header::REFERER, referer);
    }

    headers
}
