//! Record shapes returned by the CanLII REST API.
//!
//! Deserializing into these types is the response validation: a missing
//! required field fails the call, unknown fields are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDatabase {
    pub database_id: String,
    pub jurisdiction: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDatabasesResponse {
    pub case_databases: Vec<CaseDatabase>,
}

/// Case identifier keyed by language; usually only the requested one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub database_id: String,
    pub case_id: CaseId,
    pub title: String,
    pub citation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasesResponse {
    pub cases: Vec<CaseSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseMetadata {
    pub database_id: String,
    pub case_id: String,
    pub url: String,
    pub title: String,
    pub citation: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docket_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concatenated_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitedCasesResponse {
    pub cited_cases: Vec<CaseSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitingCasesResponse {
    pub citing_cases: Vec<CaseSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitedLegislation {
    pub database_id: String,
    pub legislation_id: String,
    pub title: String,
    pub citation: String,
    #[serde(rename = "type")]
    pub legislation_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitedLegislationsResponse {
    pub cited_legislations: Vec<CitedLegislation>,
}

/// Citator payload; which variant comes back depends on the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CitatorResponse {
    CitedCases(CitedCasesResponse),
    CitingCases(CitingCasesResponse),
    CitedLegislations(CitedLegislationsResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationDatabase {
    pub database_id: String,
    #[serde(rename = "type")]
    pub legislation_type: String,
    pub jurisdiction: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationDatabasesResponse {
    pub legislation_databases: Vec<LegislationDatabase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationSummary {
    pub database_id: String,
    pub legislation_id: String,
    pub title: String,
    pub citation: String,
    #[serde(rename = "type")]
    pub legislation_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationsResponse {
    pub legislations: Vec<LegislationSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationPart {
    pub part_id: String,
    pub part_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationMetadata {
    pub legislation_id: String,
    pub url: String,
    pub title: String,
    pub citation: String,
    #[serde(rename = "type")]
    pub legislation_type: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repealed: Option<String>,
    #[serde(default)]
    pub content: Vec<LegislationPart>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_list_decodes_and_ignores_unknown_fields() {
        let parsed: CasesResponse = serde_json::from_str(
            r#"{"cases":[{"databaseId":"csc-scc","caseId":{"en":"2008scc9"},
                "title":"Dunsmuir v. New Brunswick","citation":"2008 SCC 9 (CanLII)",
                "extra":true}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.cases[0].case_id.en.as_deref(), Some("2008scc9"));
        assert_eq!(parsed.cases[0].case_id.fr, None);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = serde_json::from_str::<CaseDatabasesResponse>(
            r#"{"caseDatabases":[{"databaseId":"onca","name":"Court of Appeal"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("jurisdiction"));
    }

    #[test]
    fn legislation_metadata_keeps_type_field_name() {
        let parsed: LegislationMetadata = serde_json::from_str(
            r#"{"legislationId":"rso-1990-c-h19","url":"https://canlii.ca/t/xyz",
                "title":"Human Rights Code","citation":"RSO 1990, c H.19",
                "type":"STATUTE","language":"en","repealed":"NO",
                "content":[{"partId":"1","partName":"Part I"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.legislation_type, "STATUTE");
        assert_eq!(parsed.content.len(), 1);

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["type"], "STATUTE");
        assert!(back.get("startDate").is_none());
    }
}
