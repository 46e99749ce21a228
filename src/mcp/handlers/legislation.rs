use super::common::{canlii_result, parse_date_filters, parse_language, required_str, HandlerResult};
use crate::AppState;
use serde_json::Value;
use std::sync::Arc;

pub async fn legislation_databases(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let language = parse_language(arguments)?;
    let dates = parse_date_filters(arguments);
    canlii_result(
        "get_legislation_databases",
        state.canlii.legislation_databases(language, &dates).await,
    )
}

pub async fn browse_legislation(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let language = parse_language(arguments)?;
    let database_id = required_str(arguments, "databaseId")?;
    let dates = parse_date_filters(arguments);
    canlii_result(
        "browse_legislation",
        state
            .canlii
            .browse_legislation(language, database_id, &dates)
            .await,
    )
}

/// The metadata endpoint takes no date filters.
pub async fn legislation_metadata(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let language = parse_language(arguments)?;
    let database_id = required_str(arguments, "databaseId")?;
    let legislation_id = required_str(arguments, "legislationId")?;
    canlii_result(
        "get_legislation_regulation_metadata",
        state
            .canlii
            .legislation_metadata(language, database_id, legislation_id)
            .await,
    )
}
