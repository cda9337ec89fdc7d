use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::QueryError;

/// Genomic range, `1:1000-2000`.
static GENOMIC_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([1-9]|1[0-9]|2[0-2]|[XY])\s*:\s*(\d+)\s*-\s*(\d+)\s*$").expect("valid range regex")
});
/// Genomic position, `1:1000`.
static GENOMIC_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([1-9]|1[0-9]|2[0-2]|[XY])\s*:\s*(\d+)\s*$").expect("valid position regex")
});
/// dbSNP id, `rs35735053`.
static SNP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(rs\d+)\s*$").expect("valid dbSNP regex"));
/// Gene symbol, `SCN1A`.
static GENE_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9\-]+)\s*$").expect("valid gene symbol regex"));

/// Optional constraints on variants. A query with every field absent matches
/// all variants.
///
/// `start` and `end` are 1-based as typed by users; see [`crate::filter`] for
/// how they map onto stored coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,
}

impl Query {
    /// Restricts the query to a dataset and assembly. Empty values leave that
    /// dimension unconstrained.
    pub fn scoped(mut self, dataset_id: &str, assembly_id: &str) -> Self {
        self.dataset_id = Some(dataset_id.to_string()).filter(|s| !s.is_empty());
        self.assembly_id = Some(assembly_id.to_string()).filter(|s| !s.is_empty());
        self
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Query::default()
    }
}

/// Classifies free text as a range, position, dbSNP id or gene symbol.
///
/// Text matching none of these becomes a wildcard query. The only failure is
/// a coordinate that does not fit in an `i32`.
pub fn parse(text: &str) -> Result<Query, QueryError> {
    if let Some(captures) = GENOMIC_RANGE.captures(text) {
        return Ok(Query {
            reference_name: Some(captures[1].to_string()),
            start: Some(parse_coordinate(&captures[2])?),
            end: Some(parse_coordinate(&captures[3])?),
            ..Default::default()
        });
    }
    if let Some(captures) = GENOMIC_POSITION.captures(text) {
        return Ok(Query {
            reference_name: Some(captures[1].to_string()),
            start: Some(parse_coordinate(&captures[2])?),
            ..Default::default()
        });
    }
    if let Some(captures) = SNP_ID.captures(text) {
        return Ok(Query {
            snp_id: Some(captures[1].to_string()),
            ..Default::default()
        });
    }
    if let Some(captures) = GENE_SYMBOL.captures(text) {
        return Ok(Query {
            gene_symbol: Some(captures[1].to_string()),
            ..Default::default()
        });
    }
    Ok(Query::default())
}

fn parse_coordinate(digits: &str) -> Result<i32, QueryError> {
    digits
        .parse::<i32>()
        .map_err(|_| QueryError::NumberOutOfRange(digits.to_string()))
}
