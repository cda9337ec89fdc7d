use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::filter::{compile, Predicate};
use crate::read_vcf_gz::open_vcf_stream;
use crate::search::{SearchInput, SearchResponse};
use crate::variant::Variant;

/// Backing store for variants.
///
/// Implementations guard their own state; every call is independently atomic.
pub trait VariantStore: Send + Sync {
    /// Inserts a variant that already carries its id. An existing id is a
    /// [`StoreError::Conflict`].
    fn save(&self, variant: Variant) -> Result<(), StoreError>;

    fn search(&self, input: &SearchInput) -> Result<SearchResponse, StoreError>;

    /// Deletes by scope; an empty string matches every value of that
    /// dimension. Returns the number of variants removed.
    fn remove(&self, dataset_id: &str, assembly_id: &str) -> Result<usize, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    variants: Vec<Variant>,
    ids: HashSet<String>,
}

/// Insertion-ordered in-memory store with JSON-lines snapshots.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot written by [`MemoryStore::write_snapshot`]. A missing
    /// file yields an empty store.
    pub fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let store = MemoryStore::new();
        if !path.exists() {
            return Ok(store);
        }

        let reader = open_vcf_stream(File::open(path)?)?;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let variant: Variant = serde_json::from_str(&line).map_err(|source| StoreError::Json {
                line: index + 1,
                source,
            })?;
            store.save(variant)?;
        }

        log::debug!("Loaded {} variants from {}", store.len()?, path.display());
        Ok(store)
    }

    pub fn write_snapshot(&self, path: &Path, compress: bool) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let inner = self.lock()?;

        if compress {
            let encoder = GzEncoder::new(file, Compression::default());
            let mut writer = BufWriter::new(encoder);
            write_json_lines(&mut writer, &inner.variants)?;
            writer
                .into_inner()
                .map_err(|e| e.into_error())?
                .finish()?;
        } else {
            let mut writer = BufWriter::new(file);
            write_json_lines(&mut writer, &inner.variants)?;
            writer.flush()?;
        }

        Ok(())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.variants.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn write_json_lines<W: Write>(writer: &mut W, variants: &[Variant]) -> Result<(), StoreError> {
    for variant in variants {
        serde_json::to_writer(&mut *writer, variant)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn is_match(predicate: &Option<Predicate>, variant: &Variant) -> bool {
    predicate.as_ref().is_none_or(|p| p.matches(variant))
}

impl VariantStore for MemoryStore {
    fn save(&self, variant: Variant) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if !inner.ids.insert(variant.id.clone()) {
            return Err(StoreError::Conflict(variant.id));
        }
        inner.variants.push(variant);
        Ok(())
    }

    fn search(&self, input: &SearchInput) -> Result<SearchResponse, StoreError> {
        let predicate = compile(&input.queries);
        let inner = self.lock()?;

        let matched: Vec<&Variant> = inner
            .variants
            .iter()
            .filter(|v| is_match(&predicate, v))
            .collect();

        let limit = if input.length == 0 {
            usize::MAX
        } else {
            input.length as usize
        };
        let variants = matched
            .iter()
            .skip(input.start as usize)
            .take(limit)
            .map(|v| (*v).clone())
            .collect();

        Ok(SearchResponse {
            draw: input.draw,
            records_total: inner.variants.len() as u64,
            records_filtered: matched.len() as u64,
            error: String::new(),
            variants,
        })
    }

    fn remove(&self, dataset_id: &str, assembly_id: &str) -> Result<usize, StoreError> {
        let predicate = Predicate::scope(dataset_id, assembly_id);
        let mut inner = self.lock()?;
        let before = inner.variants.len();

        let Inner { variants, ids } = &mut *inner;
        variants.retain(|v| {
            let keep = !is_match(&predicate, v);
            if !keep {
                ids.remove(&v.id);
            }
            keep
        });

        Ok(before - inner.variants.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse;
    use tempfile::tempdir;

    fn variant(dataset: &str, start: i32, gene: &str) -> Variant {
        let mut variant = Variant {
            dataset_id: dataset.to_string(),
            assembly_id: "hg38".to_string(),
            reference_name: "1".to_string(),
            start,
            reference_bases: "A".to_string(),
            alternate_bases: vec!["G".to_string()],
            gene_symbol: vec![gene.to_string()],
            ..Default::default()
        };
        variant.id = variant.canonical_id();
        variant
    }

    fn populated() -> MemoryStore {
        let store = MemoryStore::new();
        store.save(variant("a", 1, "SCN1A")).unwrap();
        store.save(variant("a", 2, "BRCA1")).unwrap();
        store.save(variant("b", 3, "SCN1A")).unwrap();
        store.save(variant("b", 4, "SCN1A")).unwrap();
        store
    }

    #[test]
    fn test_conflict_on_duplicate_id() {
        let store = MemoryStore::new();
        store.save(variant("a", 1, "SCN1A")).unwrap();
        let err = store.save(variant("a", 1, "OTHER")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == "a-hg38-1-1-A-G"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_search_counts_and_paging() {
        let store = populated();
        let input = SearchInput {
            draw: 7,
            start: 1,
            length: 1,
            queries: vec![parse("SCN1A").unwrap()],
        };

        let response = store.search(&input).unwrap();
        assert_eq!(response.draw, 7);
        assert_eq!(response.records_total, 4);
        assert_eq!(response.records_filtered, 3);
        assert_eq!(response.variants.len(), 1);
        assert_eq!(response.variants[0].start, 3);
    }

    #[test]
    fn test_search_without_queries_returns_all() {
        let response = populated().search(&SearchInput::default()).unwrap();
        assert_eq!(response.records_filtered, 4);
        assert_eq!(response.variants.len(), 4);
    }

    #[test]
    fn test_remove_by_scope() {
        let store = populated();
        assert_eq!(store.remove("a", "").unwrap(), 2);
        assert_eq!(store.len().unwrap(), 2);
        // removed ids can be saved again
        store.save(variant("a", 1, "SCN1A")).unwrap();
        assert_eq!(store.remove("", "hg19").unwrap(), 0);
        assert_eq!(store.remove("", "").unwrap(), 3);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempdir().unwrap();
        for (name, compress) in [("variants.jsonl", false), ("variants.jsonl.gz", true)] {
            let path = dir.path().join(name);
            let store = populated();
            store.write_snapshot(&path, compress).unwrap();

            let loaded = MemoryStore::load_snapshot(&path).unwrap();
            let original = store.search(&SearchInput::default()).unwrap();
            let reloaded = loaded.search(&SearchInput::default()).unwrap();
            assert_eq!(original.variants, reloaded.variants);
        }
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::load_snapshot(&dir.path().join("none.jsonl")).unwrap();
        assert!(store.is_empty().unwrap());
    }
}
