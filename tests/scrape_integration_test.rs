mod common;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect},
    routing::get,
    Router,
};
use canlii_mcp::scraping::error::ScrapeError;
use canlii_mcp::scraping::retry::RetryPolicy;
use canlii_mcp::scraping::transport::ReqwestTransport;
use canlii_mcp::scraping::Scraper;
use canlii_mcp::session_store::SessionContext;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Hits {
    root: AtomicUsize,
    flaky: AtomicUsize,
    missing: AtomicUsize,
}

async fn root(State(hits): State<Arc<Hits>>) -> impl IntoResponse {
    hits.root.fetch_add(1, Ordering::SeqCst);
    (
        AppendHeaders([
            (header::SET_COOKIE, "sid=abc123; Path=/; HttpOnly"),
            (header::SET_COOKIE, "lang=en; Path=/"),
        ]),
        Html("<html><body><main>home</main></body></html>"),
    )
}

async fn decision(headers: HeaderMap) -> Html<String> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none");
    let ua = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    Html(format!(
        "<html><head><style>p {{}}</style></head><body>\
         <nav>Menu</nav>\
         <main><h1>R v Test</h1><p>Cookie: {}</p><p class=\"ua\">{}</p></main>\
         <footer>Footer</footer></body></html>",
        cookie, ua
    ))
}

async fn flaky(State(hits): State<Arc<Hits>>) -> impl IntoResponse {
    if hits.flaky.fetch_add(1, Ordering::SeqCst) == 0 {
        (StatusCode::TOO_MANY_REQUESTS, Html("slow down".to_string()))
    } else {
        (StatusCode::OK, Html("<html><body><p>Recovered</p></body></html>".to_string()))
    }
}

async fn missing(State(hits): State<Arc<Hits>>) -> StatusCode {
    hits.missing.fetch_add(1, Ordering::SeqCst);
    StatusCode::NOT_FOUND
}

async fn fixture() -> (SocketAddr, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let app = Router::new()
        .route("/", get(root))
        .route("/decision", get(decision))
        .route("/old-link", get(|| async { Redirect::temporary("/decision") }))
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route("/flaky", get(flaky))
        .route("/missing", get(missing))
        .route("/empty", get(|| async { Html("<html><body><script>x()</script></body></html>") }))
        .with_state(hits.clone());
    (common::spawn_fixture(app).await, hits)
}

fn scraper(session_origin: &str) -> Scraper {
    let transport =
        ReqwestTransport::new(Duration::from_secs(5), Duration::from_secs(2)).unwrap();
    let session = SessionContext::from_origin(session_origin).unwrap();
    Scraper::new(Arc::new(transport), Arc::new(session), RetryPolicy::immediate())
}

#[tokio::test]
async fn session_cookies_are_captured_once_and_replayed() {
    let (addr, hits) = fixture().await;
    let s = scraper(&format!("http://{}/", addr));
    let url = format!("http://{}/decision", addr);

    let first = s.scrape_arguments(&json!({ "url": url })).await.unwrap();
    assert!(first.text.contains("Cookie: sid=abc123; lang=en"), "{}", first.text);
    assert!(!first.text.contains("Menu"));
    assert!(!first.text.contains("Footer"));

    s.scrape_arguments(&json!({ "url": url })).await.unwrap();
    assert_eq!(hits.root.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_hosts_get_no_session() {
    let (addr, hits) = fixture().await;
    // Same server, but reached through a host name the session does not cover.
    let s = scraper(&format!("http://localhost:{}/", addr.port()));

    let page = s
        .scrape_arguments(&json!({ "url": format!("http://{}/decision", addr) }))
        .await
        .unwrap();
    assert!(page.text.contains("Cookie: none"));
    assert_eq!(hits.root.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn relative_redirects_are_followed() {
    let (addr, _) = fixture().await;
    let s = scraper("https://canlii.org/");

    let page = s
        .scrape_arguments(&json!({ "url": format!("http://{}/old-link", addr) }))
        .await
        .unwrap();
    assert_eq!(page.final_url.path(), "/decision");
    assert!(page.text.starts_with("R v Test"));
}

#[tokio::test]
async fn redirect_loop_ends_as_a_fetch_error() {
    let (addr, _) = fixture().await;
    let s = scraper("https://canlii.org/");

    let err = s
        .scrape_arguments(&json!({ "url": format!("http://{}/loop", addr), "maxRedirects": 2 }))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ScrapeError::Http {
            status: 307,
            reason: "Temporary Redirect".to_string()
        }
    );
}

#[tokio::test]
async fn rate_limit_then_success() {
    let (addr, hits) = fixture().await;
    let s = scraper("https://canlii.org/");

    let page = s
        .scrape_arguments(&json!({ "url": format!("http://{}/flaky", addr) }))
        .await
        .unwrap();
    assert_eq!(page.text, "Recovered");
    assert_eq!(hits.flaky.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let (addr, hits) = fixture().await;
    let s = scraper("https://canlii.org/");

    let err = s
        .scrape_arguments(&json!({ "url": format!("http://{}/missing", addr) }))
        .await
        .unwrap_err();
    assert_eq!(err, ScrapeError::NotFound);
    assert_eq!(hits.missing.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn include_tags_and_user_agent_reach_the_page() {
    let (addr, _) = fixture().await;
    let s = scraper("https://canlii.org/");

    let page = s
        .scrape_arguments(&json!({
            "url": format!("http://{}/decision", addr),
            "includeTags": "h1, p.ua",
            "userAgent": "canlii-test/1.0"
        }))
        .await
        .unwrap();
    assert_eq!(page.text, "R v Test canlii-test/1.0");
}

#[tokio::test]
async fn script_only_page_has_no_content() {
    let (addr, _) = fixture().await;
    let s = scraper("https://canlii.org/");

    let err = s
        .scrape_arguments(&json!({ "url": format!("http://{}/empty", addr) }))
        .await
        .unwrap_err();
    assert_eq!(err, ScrapeError::NoContent);
}
