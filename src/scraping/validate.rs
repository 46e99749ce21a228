use super::tags::normalize_tags;
use crate::types::ScrapeRequest;
use scraper::Selector;
use serde_json::Value;
use url::Url;

pub const MAX_TAG_LIST_CHARS: usize = 256;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// A scrape request that passed validation; tag lists are normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub url: Url,
    pub exclude_tags: Option<String>,
    pub include_tags: Option<String>,
    pub max_redirects: usize,
    pub user_agent: Option<String>,
}

enum Field<T> {
    Absent,
    Present(T),
    WrongType,
}

impl<T> Field<T> {
    fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Present(v),
            None => Field::Absent,
        }
    }
}

fn string_field<'a>(args: &'a serde_json::Map<String, Value>, key: &str) -> Field<&'a str> {
    match args.get(key) {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::String(s)) => Field::Present(s.as_str()),
        Some(_) => Field::WrongType,
    }
}

fn positive_int_field(args: &serde_json::Map<String, Value>, key: &str) -> Field<usize> {
    match args.get(key) {
        None | Some(Value::Null) => Field::Absent,
        Some(v) => match v.as_u64() {
            Some(n) if n > 0 => Field::Present(n as usize),
            _ => Field::WrongType,
        },
    }
}

/// Validate raw tool arguments (a JSON object) before any network activity.
pub fn validate_arguments(args: &Value) -> Result<ValidatedRequest, Vec<String>> {
    let Some(obj) = args.as_object() else {
        return Err(vec!["Invalid request data".to_string()]);
    };

    validate_fields(
        string_field(obj, "url"),
        string_field(obj, "excludeTags"),
        string_field(obj, "includeTags"),
        positive_int_field(obj, "maxRedirects"),
        string_field(obj, "userAgent"),
    )
}

/// Validate an already-deserialized request.
pub fn validate_request(request: &ScrapeRequest) -> Result<ValidatedRequest, Vec<String>> {
    let max_redirects = match request.max_redirects {
        Some(0) => Field::WrongType,
        other => Field::from_option(other),
    };

    validate_fields(
        Field::Present(request.url.as_str()),
        Field::from_option(request.exclude_tags.as_deref()),
        Field::from_option(request.include_tags.as_deref()),
        max_redirects,
        Field::from_option(request.user_agent.as_deref()),
    )
}

fn validate_fields(
    url: Field<&str>,
    exclude_tags: Field<&str>,
    include_tags: Field<&str>,
    max_redirects: Field<usize>,
    user_agent: Field<&str>,
) -> Result<ValidatedRequest, Vec<String>> {
    let mut errors = Vec::new();

    let url = match url {
        Field::Present(raw) => parse_http_url(raw),
        _ => None,
    };
    if url.is_none() {
        errors.push("Invalid URL".to_string());
    }

    let exclude_tags = check_tag_list(exclude_tags, "Invalid excludeTags", &mut errors);
    let include_tags = check_tag_list(include_tags, "Invalid includeTags", &mut errors);

    let max_redirects = match max_redirects {
        Field::Absent => DEFAULT_MAX_REDIRECTS,
        Field::Present(n) => n,
        Field::WrongType => {
            errors.push("Invalid maxRedirects".to_string());
            DEFAULT_MAX_REDIRECTS
        }
    };

    let user_agent = match user_agent {
        Field::Absent => None,
        Field::Present(ua) if ua.trim().is_empty() => None,
        Field::Present(ua) => Some(ua.to_string()),
        Field::WrongType => {
            errors.push("Invalid userAgent".to_string());
            None
        }
    };

    match url {
        Some(url) if errors.is_empty() => Ok(ValidatedRequest {
            url,
            exclude_tags,
            include_tags,
            max_redirects,
            user_agent,
        }),
        _ => Err(errors),
    }
}

fn parse_http_url(raw: &str) -> Option<Url> {
    if raw.is_empty() || !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return None;
    }
    Url::parse(raw).ok()
}

/// Length-check, normalize and selector-check a tag list. An empty list after
/// normalization counts as absent.
fn check_tag_list(field: Field<&str>, message: &str, errors: &mut Vec<String>) -> Option<String> {
    match field {
        Field::Absent => None,
        Field::WrongType => {
            errors.push(message.to_string());
            None
        }
        Field::Present(raw) if raw.chars().count() > MAX_TAG_LIST_CHARS => {
            errors.push(message.to_string());
            None
        }
        Field::Present(raw) => {
            let normalized = normalize_tags(Some(raw)).filter(|t| !t.is_empty())?;
            if Selector::parse(&normalized).is_err() {
                errors.push(message.to_string());
                return None;
            }
            Some(normalized)
        }
    }
}
