use super::common::{
    bad_request, canlii_result, parse_date_filters, parse_language, required_str, required_u64,
    HandlerResult,
};
use crate::tools::canlii::{CitatorKind, MAX_RESULT_COUNT};
use crate::AppState;
use serde_json::Value;
use std::sync::Arc;

pub async fn courts_and_tribunals(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let language = parse_language(arguments)?;
    let dates = parse_date_filters(arguments);
    canlii_result(
        "get_courts_and_tribunals",
        state.canlii.case_databases(language, &dates).await,
    )
}

pub async fn case_law_decisions(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let language = parse_language(arguments)?;
    let database_id = required_str(arguments, "databaseId")?;
    let offset = required_u64(arguments, "offset")?;
    let result_count = required_u64(arguments, "resultCount")?;
    if result_count == 0 || result_count > MAX_RESULT_COUNT {
        return Err(bad_request(format!(
            "Invalid resultCount: must be between 1 and {}",
            MAX_RESULT_COUNT
        )));
    }
    let dates = parse_date_filters(arguments);
    canlii_result(
        "get_case_law_decisions",
        state
            .canlii
            .case_law_decisions(language, database_id, offset, result_count, &dates)
            .await,
    )
}

pub async fn case_metadata(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let language = parse_language(arguments)?;
    let database_id = required_str(arguments, "databaseId")?;
    let case_id = required_str(arguments, "caseId")?;
    let dates = parse_date_filters(arguments);
    canlii_result(
        "get_case_metadata",
        state
            .canlii
            .case_metadata(language, database_id, case_id, &dates)
            .await,
    )
}

pub async fn case_citator(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let language = parse_language(arguments)?;
    let database_id = required_str(arguments, "databaseId")?;
    let case_id = required_str(arguments, "caseId")?;
    let kind = CitatorKind::parse_str(required_str(arguments, "metadataType")?).ok_or_else(|| {
        bad_request("Invalid metadataType. Allowed values: citedCases, citingCases, citedLegislations")
    })?;
    let dates = parse_date_filters(arguments);
    canlii_result(
        "get_case_citator",
        state
            .canlii
            .case_citator(language, database_id, case_id, kind, &dates)
            .await,
    )
}
