use crate::scraping::retry::RetryPolicy;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CanliiConfig: file-based config loader (canlii-mcp.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "CANLII_MCP_CONFIG";
pub const ENV_API_KEY: &str = "CANLII_API";
pub const ENV_API_BASE_URL: &str = "CANLII_API_BASE_URL";
pub const ENV_SESSION_ORIGIN: &str = "CANLII_SESSION_ORIGIN";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT: &str = "HTTP_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_API_BASE_URL: &str = "https://api.canlii.org/v1";
pub const DEFAULT_SESSION_ORIGIN: &str = "https://canlii.org/";

/// Top-level config loaded from `canlii-mcp.json`. Every field is optional;
/// the `resolve_*` methods fall back to the environment, then to defaults.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct CanliiConfig {
    /// CanLII REST API key. Never logged.
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    /// Site whose root hands out the session cookies replayed by the scraper.
    pub session_origin: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn field_non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CanliiConfig {
    /// API key: JSON field → `CANLII_API` env var → `None`.
    pub fn resolve_api_key(&self) -> Option<String> {
        field_non_empty(&self.api_key).or_else(|| env_non_empty(ENV_API_KEY))
    }

    /// API base URL: JSON field → `CANLII_API_BASE_URL` → `https://api.canlii.org/v1`.
    pub fn resolve_api_base_url(&self) -> String {
        field_non_empty(&self.api_base_url)
            .or_else(|| env_non_empty(ENV_API_BASE_URL))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Session origin: JSON field → `CANLII_SESSION_ORIGIN` → `https://canlii.org/`.
    pub fn resolve_session_origin(&self) -> String {
        field_non_empty(&self.session_origin)
            .or_else(|| env_non_empty(ENV_SESSION_ORIGIN))
            .unwrap_or_else(|| DEFAULT_SESSION_ORIGIN.to_string())
    }

    /// Whole-request timeout: JSON field → `HTTP_TIMEOUT_SECS` → 30.
    pub fn resolve_http_timeout_secs(&self) -> u64 {
        self.http_timeout_secs
            .or_else(|| env_non_empty(ENV_HTTP_TIMEOUT).and_then(|v| v.parse().ok()))
            .unwrap_or(30)
    }

    /// Connect timeout: JSON field → `HTTP_CONNECT_TIMEOUT_SECS` → 10.
    pub fn resolve_connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs
            .or_else(|| env_non_empty(ENV_CONNECT_TIMEOUT).and_then(|v| v.parse().ok()))
            .unwrap_or(10)
    }
}

fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(explicit) = env_non_empty(ENV_CONFIG_PATH) {
        candidates.push(PathBuf::from(explicit));
    }
    candidates.push(PathBuf::from("canlii-mcp.json"));
    candidates.push(PathBuf::from("../canlii-mcp.json"));
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".canlii-mcp").join("config.json"));
    }
    candidates
}

/// Load `canlii-mcp.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `CANLII_MCP_CONFIG` env var path
/// 2. `./canlii-mcp.json`
/// 3. `../canlii-mcp.json`
/// 4. `~/.canlii-mcp/config.json`
///
/// Missing file → defaults (env-var fallbacks apply).
/// Parse error → warning, defaults.
pub fn load_config() -> CanliiConfig {
    for path in config_candidates() {
        let Ok(contents) = std::fs::read_to_string(&path) else {
            continue;
        };
        return match serde_json::from_str::<CanliiConfig>(&contents) {
            Ok(cfg) => {
                tracing::info!("canlii-mcp config loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    "canlii-mcp config parse error at {}: {}; using defaults",
                    path.display(),
                    e
                );
                CanliiConfig::default()
            }
        };
    }

    CanliiConfig::default()
}
