use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_STORE: &str = "variants.jsonl";

/// Optional defaults read from a TOML file. Command-line flags take
/// precedence over every key.
///
/// ```toml
/// store = "data/variants.jsonl.gz"
/// dataset = "bipmed-wes"
/// assembly = "hg38"
/// threads = 4
/// filter = true
/// format = "tsv"
/// ```
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExplorerConfig {
    pub store: Option<PathBuf>,
    pub dataset: Option<String>,
    pub assembly: Option<String>,
    pub threads: Option<usize>,
    pub filter: Option<bool>,
    pub format: Option<String>,
}

impl ExplorerConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Reads the file when given, otherwise returns empty defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn store_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.store.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE))
    }

    pub fn dataset(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.dataset.clone()).unwrap_or_default()
    }

    pub fn assembly(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.assembly.clone()).unwrap_or_default()
    }
}
