//! Compiles parsed queries into a predicate tree over stored variants.
//!
//! Coordinates: query text is 1-based, and a range `c:s-e` is half-open
//! `[s, e)`. Stored variants carry a 0-based `start`. The compiled predicate
//! is the authoritative form and is inclusive on both ends: a position `p`
//! becomes `start == p - 1`, a range becomes `start ∈ [s - 1, e - 2]`.

use crate::query::Query;
use crate::variant::Variant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    DatasetIs(String),
    AssemblyIs(String),
    ReferenceNameIs(String),
    StartIs(i64),
    /// Inclusive on both ends.
    StartBetween(i64, i64),
    GeneSymbolContains(String),
    SnpIdContains(String),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, variant: &Variant) -> bool {
        match self {
            Predicate::DatasetIs(id) => variant.dataset_id == *id,
            Predicate::AssemblyIs(id) => variant.assembly_id == *id,
            Predicate::ReferenceNameIs(name) => variant.reference_name == *name,
            Predicate::StartIs(start) => i64::from(variant.start) == *start,
            Predicate::StartBetween(low, high) => (*low..=*high).contains(&i64::from(variant.start)),
            Predicate::GeneSymbolContains(symbol) => variant.gene_symbol.iter().any(|g| g == symbol),
            Predicate::SnpIdContains(id) => variant.snp_ids.iter().any(|s| s == id),
            Predicate::And(clauses) => clauses.iter().all(|c| c.matches(variant)),
            Predicate::Or(clauses) => clauses.iter().any(|c| c.matches(variant)),
        }
    }

    /// Dataset/assembly scope used for removal; empty strings match anything.
    /// `None` means every variant.
    pub fn scope(dataset_id: &str, assembly_id: &str) -> Option<Predicate> {
        let mut clauses = Vec::new();
        if !dataset_id.is_empty() {
            clauses.push(Predicate::DatasetIs(dataset_id.to_string()));
        }
        if !assembly_id.is_empty() {
            clauses.push(Predicate::AssemblyIs(assembly_id.to_string()));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(Predicate::And(clauses))
        }
    }
}

/// ORs the queries together, ANDing the present fields of each one.
/// An empty list compiles to `None`, which matches everything.
pub fn compile(queries: &[Query]) -> Option<Predicate> {
    if queries.is_empty() {
        return None;
    }
    Some(Predicate::Or(queries.iter().map(compile_query).collect()))
}

fn compile_query(query: &Query) -> Predicate {
    let mut clauses = Vec::new();

    if let Some(assembly_id) = &query.assembly_id {
        clauses.push(Predicate::AssemblyIs(assembly_id.clone()));
    }
    if let Some(symbol) = &query.gene_symbol {
        clauses.push(Predicate::GeneSymbolContains(symbol.clone()));
    }
    if let Some(dataset_id) = &query.dataset_id {
        clauses.push(Predicate::DatasetIs(dataset_id.clone()));
    }
    if let Some(snp_id) = &query.snp_id {
        clauses.push(Predicate::SnpIdContains(snp_id.clone()));
    }

    // positions are only meaningful on a contig
    if let Some(reference_name) = &query.reference_name {
        clauses.push(Predicate::ReferenceNameIs(reference_name.clone()));
        match (query.start, query.end) {
            (Some(start), Some(end)) => clauses.push(Predicate::StartBetween(
                i64::from(start) - 1,
                i64::from(end) - 2,
            )),
            (Some(start), None) => clauses.push(Predicate::StartIs(i64::from(start) - 1)),
            _ => {}
        }
    }

    Predicate::And(clauses)
}
