use crate::error::{QueryError, StoreError};
use crate::query::{parse, Query};
use crate::search::{SearchInput, SearchResponse};
use crate::store::VariantStore;
use crate::variant::Variant;

/// Owns a store and the identity rule for what goes into it.
pub struct VariantExplorer<S: VariantStore> {
    store: S,
}

impl<S: VariantStore> VariantExplorer<S> {
    pub fn new(store: S) -> Self {
        VariantExplorer { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Assigns the canonical id and saves. Re-inserting the same scope,
    /// position and alleles is a [`StoreError::Conflict`].
    pub fn insert_variant(&self, mut variant: Variant) -> Result<String, StoreError> {
        variant.id = variant.canonical_id();
        let id = variant.id.clone();
        self.store.save(variant)?;
        Ok(id)
    }

    pub fn search(&self, input: &SearchInput) -> Result<SearchResponse, StoreError> {
        self.store.search(input)
    }

    pub fn remove_variants(&self, dataset_id: &str, assembly_id: &str) -> Result<usize, StoreError> {
        let removed = self.store.remove(dataset_id, assembly_id)?;
        log::info!(
            "Removed {removed} variants (dataset '{dataset_id}', assembly '{assembly_id}')"
        );
        Ok(removed)
    }
}

/// Parses every text and scopes it to the dataset and assembly.
///
/// Text that is not a range, position, dbSNP id or gene symbol is kept as a
/// wildcard and matches every variant in scope.
pub fn parse_queries<T: AsRef<str>>(
    texts: &[T],
    dataset_id: &str,
    assembly_id: &str,
) -> Result<Vec<Query>, QueryError> {
    let mut queries = Vec::with_capacity(texts.len());
    for text in texts {
        let query = parse(text.as_ref())?;
        if query.is_wildcard() {
            log::warn!("'{}' is not a recognised query, it matches every variant", text.as_ref());
        }
        queries.push(query.scoped(dataset_id, assembly_id));
    }
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn variant() -> Variant {
        Variant {
            dataset_id: "bipmed".to_string(),
            assembly_id: "hg38".to_string(),
            reference_name: "1".to_string(),
            start: 65100,
            reference_bases: "A".to_string(),
            alternate_bases: vec!["G".to_string()],
            gene_symbol: vec!["OR4F5".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_is_idempotent_on_identity() {
        let explorer = VariantExplorer::new(MemoryStore::new());

        let id = explorer.insert_variant(variant()).unwrap();
        assert_eq!(id, "bipmed-hg38-1-65100-A-G");

        let err = explorer.insert_variant(variant()).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(conflict) if conflict == id));
        assert_eq!(explorer.store().len().unwrap(), 1);
    }

    #[test]
    fn test_scoped_search() {
        let explorer = VariantExplorer::new(MemoryStore::new());
        explorer.insert_variant(variant()).unwrap();

        let queries = parse_queries(&["1:65000-70000", "BRCA2"], "bipmed", "hg38").unwrap();
        let response = explorer
            .search(&SearchInput {
                queries,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(response.records_filtered, 1);

        let queries = parse_queries(&["OR4F5"], "other", "").unwrap();
        let response = explorer
            .search(&SearchInput {
                queries,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(response.records_filtered, 0);
    }

    #[test]
    fn test_unrecognised_text_is_scoped_wildcard() {
        let queries = parse_queries(&["not a gene!", "SCN1A"], "bipmed", "").unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(
            queries[0],
            Query {
                dataset_id: Some("bipmed".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(queries[1].gene_symbol.as_deref(), Some("SCN1A"));
    }

    #[test]
    fn test_remove_variants() {
        let explorer = VariantExplorer::new(MemoryStore::new());
        explorer.insert_variant(variant()).unwrap();
        assert_eq!(explorer.remove_variants("bipmed", "hg19").unwrap(), 0);
        assert_eq!(explorer.remove_variants("bipmed", "hg38").unwrap(), 1);
    }
}
