use super::transport::{FetchedPage, HttpTransport};
use crate::session_store::{cookie_pairs, merge_cookie_pairs, SessionContext};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Result of one fetch: the last response seen plus every URL visited after
/// the first, in order.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    pub response: FetchedPage,
    pub redirect_chain: Vec<Url>,
    /// `name=value` pairs set anywhere along the chain; later hops win.
    pub set_cookies: Vec<String>,
}

impl FetchAttempt {
    pub fn redirects_followed(&self) -> usize {
        self.redirect_chain.len()
    }
}

/// GET `url`, following 3xx responses by hand.
///
/// Stops when the response is not a redirect, carries no usable `Location`,
/// or `max_redirects` hops have been taken. In the last case the
/// still-redirecting response is returned unchanged; status interpretation
/// belongs to the caller.
pub async fn fetch_with_redirects(
    transport: &dyn HttpTransport,
    session: &SessionContext,
    url: &Url,
    base_headers: &HeaderMap,
    max_redirects: usize,
    redirect_delay: Duration,
) -> anyhow::Result<FetchAttempt> {
    let mut current = url.clone();
    let mut response = transport
        .get(&current, &hop_headers(base_headers, session, &current))
        .await?;
    let mut redirect_chain = Vec::new();
    let mut set_cookies = cookie_pairs(&response.headers);

    while response.is_redirect() && redirect_chain.len() < max_redirects {
        let Some(next) = response.location().and_then(|loc| current.join(loc).ok()) else {
            break;
        };

        tokio::time::sleep(redirect_delay).await;

        debug!(
            "Following redirect {} -> {} ({}/{})",
            response.status,
            next,
            redirect_chain.len() + 1,
            max_redirects
        );
        response = transport
            .get(&next, &hop_headers(base_headers, session, &next))
            .await?;
        merge_cookie_pairs(&mut set_cookies, cookie_pairs(&response.headers));
        redirect_chain.push(next.clone());
        current = next;
    }

    Ok(FetchAttempt {
        response,
        redirect_chain,
        set_cookies,
    })
}

fn hop_headers(base: &HeaderMap, session: &SessionContext, url: &Url) -> HeaderMap {
    let mut headers = base.clone();
    if let Some(cookie) = session
        .cookie_header_for(url)
        .and_then(|c| HeaderValue::from_str(&c).ok())
    {
        headers.insert(COOKIE, cookie);
    }
    headers
}
