use super::schema::*;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const MAX_RESULT_COUNT: u64 = 10_000;

#[derive(Debug, Error)]
pub enum CanliiError {
    #[error("CanLII API key is not configured (set CANLII_API or api_key in canlii-mcp.json)")]
    MissingApiKey,

    #[error("Failed to fetch {what} ({status})")]
    Status { what: &'static str, status: u16 },

    #[error("Unexpected response shape: {0}")]
    Schema(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API base URL: {0}")]
    BaseUrl(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn parse_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "fr" => Some(Language::Fr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CitatorKind {
    CitedCases,
    CitingCases,
    CitedLegislations,
}

impl CitatorKind {
    pub fn parse_str(value: &str) -> Option<Self> {
        match value.trim() {
            "citedCases" => Some(CitatorKind::CitedCases),
            "citingCases" => Some(CitatorKind::CitingCases),
            "citedLegislations" => Some(CitatorKind::CitedLegislations),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CitatorKind::CitedCases => "citedCases",
            CitatorKind::CitingCases => "citingCases",
            CitatorKind::CitedLegislations => "citedLegislations",
        }
    }
}

/// Optional date filters shared by most endpoints (YYYY-MM-DD).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateFilters {
    pub published_before: Option<String>,
    pub published_after: Option<String>,
    pub modified_before: Option<String>,
    pub modified_after: Option<String>,
    pub changed_before: Option<String>,
    pub changed_after: Option<String>,
    pub decision_date_before: Option<String>,
    pub decision_date_after: Option<String>,
}

impl DateFilters {
    pub const PARAM_NAMES: [&'static str; 8] = [
        "publishedBefore",
        "publishedAfter",
        "modifiedBefore",
        "modifiedAfter",
        "changedBefore",
        "changedAfter",
        "decisionDateBefore",
        "decisionDateAfter",
    ];

    /// Pick the filters out of tool arguments; blank and non-string values are skipped.
    pub fn from_arguments(arguments: &Value) -> Self {
        let get = |key: &str| {
            arguments
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            published_before: get("publishedBefore"),
            published_after: get("publishedAfter"),
            modified_before: get("modifiedBefore"),
            modified_after: get("modifiedAfter"),
            changed_before: get("changedBefore"),
            changed_after: get("changedAfter"),
            decision_date_before: get("decisionDateBefore"),
            decision_date_after: get("decisionDateAfter"),
        }
    }

    fn query_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let values = [
            &self.published_before,
            &self.published_after,
            &self.modified_before,
            &self.modified_after,
            &self.changed_before,
            &self.changed_after,
            &self.decision_date_before,
            &self.decision_date_after,
        ];
        Self::PARAM_NAMES
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }
}

/// Thin client for `https://api.canlii.org/v1`. One GET per call, response
/// decoded into the fixed record shapes in [`super::schema`].
#[derive(Clone)]
pub struct CanliiClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for CanliiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanliiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key_set", &self.api_key.is_some())
            .finish()
    }
}

impl CanliiClient {
    pub fn new(http: Client, base_url: &str, api_key: Option<String>) -> Result<Self, CanliiError> {
        let base_url = Url::parse(base_url).map_err(|e| CanliiError::BaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(CanliiError::BaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build `{base}/{segments...}` (plus a trailing slash when asked) with
    /// `api_key`, `extra` and the date filters as query parameters.
    pub fn endpoint(
        &self,
        segments: &[&str],
        trailing_slash: bool,
        extra: &[(&str, String)],
        dates: Option<&DateFilters>,
    ) -> Result<Url, CanliiError> {
        let api_key = self.api_key.as_deref().ok_or(CanliiError::MissingApiKey)?;

        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| CanliiError::BaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
            if trailing_slash {
                path.push("");
            }
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", api_key);
            for (name, value) in extra {
                query.append_pair(name, value);
            }
            if let Some(dates) = dates {
                for (name, value) in dates.query_pairs() {
                    query.append_pair(name, value);
                }
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &'static str) -> Result<T, CanliiError> {
        debug!("CanLII API GET {}{}", url.origin().ascii_serialization(), url.path());
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            info!("CanLII API answered {} for {}", status, what);
            return Err(CanliiError::Status {
                what,
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CanliiError::Schema(e.to_string()))
    }

    /// Courts and tribunals (case databases) available in `language`.
    pub async fn case_databases(
        &self,
        language: Language,
        dates: &DateFilters,
    ) -> Result<CaseDatabasesResponse, CanliiError> {
        let url = self.endpoint(&["caseBrowse", language.as_str()], true, &[], Some(dates))?;
        self.get_json(url, "databases").await
    }

    pub async fn case_law_decisions(
        &self,
        language: Language,
        database_id: &str,
        offset: u64,
        result_count: u64,
        dates: &DateFilters,
    ) -> Result<CasesResponse, CanliiError> {
        let url = self.endpoint(
            &["caseBrowse", language.as_str(), database_id],
            true,
            &[
                ("offset", offset.to_string()),
                ("resultCount", result_count.to_string()),
            ],
            Some(dates),
        )?;
        self.get_json(url, "case law decisions").await
    }

    pub async fn case_metadata(
        &self,
        language: Language,
        database_id: &str,
        case_id: &str,
        dates: &DateFilters,
    ) -> Result<CaseMetadata, CanliiError> {
        let url = self.endpoint(
            &["caseBrowse", language.as_str(), database_id, case_id],
            true,
            &[],
            Some(dates),
        )?;
        self.get_json(url, "case metadata").await
    }

    pub async fn case_citator(
        &self,
        language: Language,
        database_id: &str,
        case_id: &str,
        kind: CitatorKind,
        dates: &DateFilters,
    ) -> Result<CitatorResponse, CanliiError> {
        let url = self.endpoint(
            &["caseCitator", language.as_str(), database_id, case_id, kind.as_str()],
            false,
            &[],
            Some(dates),
        )?;
        let what = "case citator data";
        Ok(match kind {
            CitatorKind::CitedCases => CitatorResponse::CitedCases(self.get_json(url, what).await?),
            CitatorKind::CitingCases => CitatorResponse::CitingCases(self.get_json(url, what).await?),
            CitatorKind::CitedLegislations => {
                CitatorResponse::CitedLegislations(self.get_json(url, what).await?)
            }
        })
    }

    pub async fn legislation_databases(
        &self,
        language: Language,
        dates: &DateFilters,
    ) -> Result<LegislationDatabasesResponse, CanliiError> {
        let url = self.endpoint(
            &["legislationBrowse", language.as_str()],
            true,
            &[],
            Some(dates),
        )?;
        self.get_json(url, "legislation databases").await
    }

    pub async fn browse_legislation(
        &self,
        language: Language,
        database_id: &str,
        dates: &DateFilters,
    ) -> Result<LegislationsResponse, CanliiError> {
        let url = self.endpoint(
            &["legislationBrowse", language.as_str(), database_id],
            true,
            &[],
            Some(dates),
        )?;
        self.get_json(url, "legislation").await
    }

    pub async fn legislation_metadata(
        &self,
        language: Language,
        database_id: &str,
        legislation_id: &str,
    ) -> Result<LegislationMetadata, CanliiError> {
        let url = self.endpoint(
            &["legislationBrowse", language.as_str(), database_id, legislation_id],
            true,
            &[],
            None,
        )?;
        self.get_json(url, "legislation metadata").await
    }
}
