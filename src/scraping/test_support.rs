//! Scripted transport for driving the fetcher and retry loop without a network.

use super::transport::{FetchedPage, HttpTransport};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;
use url::Url;

pub(crate) type Scripted = Result<FetchedPage, String>;

pub(crate) fn page(status: StatusCode, body: &str) -> FetchedPage {
    FetchedPage {
        url: Url::parse("http://placeholder.invalid/").unwrap(),
        status,
        headers: HeaderMap::new(),
        body: body.to_string(),
    }
}

pub(crate) fn redirect(status: StatusCode, location: &str) -> FetchedPage {
    page(status, "").with_header(LOCATION.as_str(), location)
}

impl FetchedPage {
    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
        self
    }
}

#[derive(Debug, Clone)]
struct Call {
    url: Url,
    headers: HeaderMap,
    at: Instant,
}

/// Replays queued responses in order. With `always`, the single response is
/// replayed forever.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    repeat: Option<Scripted>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            repeat: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn always(response: Scripted) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat: Some(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn requested_urls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().iter().map(|c| c.url.clone()).collect()
    }

    pub(crate) fn requested_headers(&self) -> Vec<HeaderMap> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.headers.clone())
            .collect()
    }

    pub(crate) fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|c| c.at).collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &Url, headers: &HeaderMap) -> anyhow::Result<FetchedPage> {
        self.calls.lock().unwrap().push(Call {
            url: url.clone(),
            headers: headers.clone(),
            at: Instant::now(),
        });

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat.clone())
            .unwrap_or_else(|| Err(format!("no scripted response left for {}", url)));

        match next {
            Ok(mut page) => {
                page.url = url.clone();
                Ok(page)
            }
            Err(message) => Err(anyhow::anyhow!(message)),
        }
    }
}
