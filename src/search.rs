use serde::{Deserialize, Serialize};

use crate::query::Query;
use crate::variant::Variant;

/// A paged search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchInput {
    /// Echoed back in the response.
    #[serde(default)]
    pub draw: i64,
    /// Number of matching variants to skip.
    #[serde(default)]
    pub start: u64,
    /// Page size; 0 returns every match.
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub queries: Vec<Query>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub draw: i64,
    /// Variants in the store, before filtering.
    pub records_total: u64,
    /// Variants matching the queries, before paging.
    pub records_filtered: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(rename = "data")]
    pub variants: Vec<Variant>,
}
