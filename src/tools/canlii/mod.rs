//! CanLII REST API: typed requests and response records.

pub mod client;
pub mod schema;

pub use client::{CanliiClient, CanliiError, CitatorKind, DateFilters, Language, MAX_RESULT_COUNT};
