use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ToolCatalogEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

const LANGUAGE_DESCRIPTION: &str = "The language option: 'en' for English or 'fr' for French";
const LEGISLATION_DATABASE_DESCRIPTION: &str = "The code for the database for which you want a list. Generally, this will be the provincial or territorial two-letter code, followed by either 's' (for statutes), 'r' (for regulations), or 'a' (for annual statutes)";
const CASE_DATABASE_DESCRIPTION: &str = "The database identifier from which to fetch decisions";
const CASE_ID_DESCRIPTION: &str = "The case's unique identifier, as returned by the previous type of call. Generally corresponds to the CanLII citation.";

fn language_property() -> Value {
    json!({
        "type": "string",
        "enum": ["en", "fr"],
        "description": LANGUAGE_DESCRIPTION
    })
}

fn date_property(description: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("{} (YYYY-MM-DD format)", description)
    })
}

/// The eight optional date filters forwarded to the CanLII API.
fn date_properties() -> Map<String, Value> {
    let published = "The date when the decision was first published on CanLII";
    let modified = "The date when the content of the decision was last modified on CanLII";
    let changed = "The date the metadata of the decision or its content was last modified on CanLII";
    let decided = "The date of the decision";

    let mut props = Map::new();
    for (name, description) in [
        ("publishedBefore", published),
        ("publishedAfter", published),
        ("modifiedBefore", modified),
        ("modifiedAfter", modified),
        ("changedBefore", changed),
        ("changedAfter", changed),
        ("decisionDateBefore", decided),
        ("decisionDateAfter", decided),
    ] {
        props.insert(name.to_string(), date_property(description));
    }
    props
}

/// Object schema with `properties`, the date filters merged in when `with_dates`.
fn object_schema(properties: Value, required: &[&str], with_dates: bool) -> Value {
    let mut props = match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if with_dates {
        props.extend(date_properties());
    }
    json!({
        "type": "object",
        "properties": props,
        "required": required
    })
}

pub fn tool_catalog() -> Vec<ToolCatalogEntry> {
    vec![
        ToolCatalogEntry {
            name: "get_courts_and_tribunals",
            title: "Courts and Tribunals",
            description: "List the courts and tribunals (case law databases) available on CanLII.",
            input_schema: object_schema(
                json!({ "language": language_property() }),
                &["language"],
                true,
            ),
        },
        ToolCatalogEntry {
            name: "get_case_law_decisions",
            title: "Case Law Decisions",
            description: "List decisions from one court or tribunal database, most recently added first.",
            input_schema: object_schema(
                json!({
                    "language": language_property(),
                    "databaseId": {"type": "string", "description": CASE_DATABASE_DESCRIPTION},
                    "offset": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "The record number from which to start returning results. Using 0 will return the records most recently added to that database"
                    },
                    "resultCount": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 10000,
                        "description": "The length of the list of results that will be returned. Max 10,000"
                    }
                }),
                &["language", "databaseId", "offset", "resultCount"],
                true,
            ),
        },
        ToolCatalogEntry {
            name: "get_case_metadata",
            title: "Case Metadata",
            description: "Fetch metadata (title, citation, decision date, keywords, URL) for one decision.",
            input_schema: object_schema(
                json!({
                    "language": language_property(),
                    "databaseId": {"type": "string", "description": CASE_DATABASE_DESCRIPTION},
                    "caseId": {"type": "string", "description": CASE_ID_DESCRIPTION}
                }),
                &["language", "databaseId", "caseId"],
                true,
            ),
        },
        ToolCatalogEntry {
            name: "get_case_citator",
            title: "Case Citator",
            description: "Citation data for a decision: the cases it cites, the cases citing it, or the legislation it cites.",
            input_schema: object_schema(
                json!({
                    "language": language_property(),
                    "databaseId": {"type": "string", "description": CASE_DATABASE_DESCRIPTION},
                    "caseId": {"type": "string", "description": CASE_ID_DESCRIPTION},
                    "metadataType": {
                        "type": "string",
                        "enum": ["citedCases", "citingCases", "citedLegislations"],
                        "description": "The type of citation metadata to fetch: citedCases (what this case cites), citingCases (what cases cite this case), or citedLegislations (what legislation this case cites)"
                    }
                }),
                &["language", "databaseId", "caseId", "metadataType"],
                true,
            ),
        },
        ToolCatalogEntry {
            name: "get_legislation_databases",
            title: "Legislation Databases",
            description: "List the statute and regulation databases available on CanLII.",
            input_schema: object_schema(
                json!({ "language": language_property() }),
                &["language"],
                true,
            ),
        },
        ToolCatalogEntry {
            name: "browse_legislation",
            title: "Browse Legislation",
            description: "List the statutes or regulations in one legislation database.",
            input_schema: object_schema(
                json!({
                    "language": language_property(),
                    "databaseId": {"type": "string", "description": LEGISLATION_DATABASE_DESCRIPTION}
                }),
                &["language", "databaseId"],
                true,
            ),
        },
        ToolCatalogEntry {
            name: "get_legislation_regulation_metadata",
            title: "Legislation Metadata",
            description: "Fetch metadata (title, citation, dates, parts) for one statute or regulation.",
            input_schema: object_schema(
                json!({
                    "language": language_property(),
                    "databaseId": {"type": "string", "description": LEGISLATION_DATABASE_DESCRIPTION},
                    "legislationId": {"type": "string", "description": "Specific ID for the piece of legislation that is being queried."}
                }),
                &["language", "databaseId", "legislationId"],
                false,
            ),
        },
        ToolCatalogEntry {
            name: "scrape_website",
            title: "Scrape Website",
            description: "Fetch a web page and return its readable text with the source URL. Always cite the sourceUrl when presenting the content.",
            input_schema: object_schema(
                json!({
                    "url": {
                        "type": "string",
                        "description": "The URL of the website to scrape text content from. When presenting any scraped content to users, include this source URL for attribution and verification."
                    },
                    "excludeTags": {
                        "type": "string",
                        "description": "Comma-separated list of HTML tags or selectors to exclude, on top of script,style,nav,header,footer,aside"
                    },
                    "includeTags": {
                        "type": "string",
                        "description": "Comma-separated list of HTML tags or selectors to include (if specified, only these are scraped)"
                    },
                    "maxRedirects": {
                        "type": "integer",
                        "minimum": 1,
                        "default": 10,
                        "description": "Maximum number of redirects to follow (default: 10)"
                    },
                    "userAgent": {
                        "type": "string",
                        "description": "User agent string to use for the request (default: a desktop Chrome user agent)"
                    }
                }),
                &["url"],
                false,
            ),
        },
    ]
}

pub fn find_tool(name: &str) -> Option<ToolCatalogEntry> {
    tool_catalog().into_iter().find(|tool| tool.name == name)
}

pub fn schema_to_object_map(schema: &Value) -> Arc<Map<String, Value>> {
    match schema {
        Value::Object(map) => Arc::new(map.clone()),
        _ => Arc::new(Map::new()),
    }
}
