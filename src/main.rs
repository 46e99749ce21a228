use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use canlii_mcp::{core::config::load_config, mcp, scrape, types::*, AppState};

const DEFAULT_PORT: u16 = 5000;

/// `--port N` or `--port=N` wins over `CANLII_MCP_PORT`, then `PORT`.
fn resolve_port<I>(args: I, env: impl Fn(&str) -> Option<String>) -> u16
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut from_args = None;
    while let Some(arg) = args.next() {
        let value = match arg.strip_prefix("--port") {
            Some("") => args.next(),
            Some(rest) => rest.strip_prefix('=').map(str::to_string),
            None => None,
        };
        if let Some(port) = value.and_then(|v| v.trim().parse().ok()) {
            from_args = Some(port);
            break;
        }
    }
    from_args
        .or_else(|| {
            ["CANLII_MCP_PORT", "PORT"]
                .into_iter()
                .find_map(|key| env(key)?.trim().parse().ok())
        })
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting CanLII MCP HTTP server");

    let state = Arc::new(AppState::new(load_config())?);

    let app = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/scrape", post(scrape_handler))
        .route("/mcp/tools", get(mcp::list_tools))
        .route("/mcp/call", post(mcp::call_tool))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port = resolve_port(std::env::args().skip(1), |key| std::env::var(key).ok());
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Address already in use: {}. Stop the existing process or run with --port {} (or set PORT/CANLII_MCP_PORT).",
                bind_addr,
                port.saturating_add(1)
            )
        }
        Err(e) => return Err(e.into()),
    };
    info!("CanLII MCP server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => futures::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = futures::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "canlii-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn scrape_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeWebsiteResponse>, (StatusCode, Json<ErrorResponse>)> {
    match scrape::scrape_request(&state.scraper, &request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Scrape error: {}", e);
            let status = match &e {
                canlii_mcp::scraping::error::ScrapeError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            Err((
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn port_flag_beats_environment() {
        let env = |key: &str| (key == "PORT").then(|| "7000".to_string());
        assert_eq!(resolve_port(args(&["--port", "8080"]), env), 8080);
        assert_eq!(resolve_port(args(&["--port=8081"]), env), 8081);
        assert_eq!(resolve_port(args(&[]), env), 7000);
    }

    #[test]
    fn bad_values_fall_through_to_default() {
        let env = |key: &str| (key == "CANLII_MCP_PORT").then(|| "not-a-port".to_string());
        assert_eq!(resolve_port(args(&["--port", "x", "--portal"]), env), DEFAULT_PORT);
    }
}
