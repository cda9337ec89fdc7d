use thiserror::Error;

use crate::import_vcf::VcfSummary;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum VcfError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("VCF stream ended or reached a record before the #CHROM header line")]
    MissingHeader,
    #[error("VCF line {line} has too few fields ({found}, expected at least 8)")]
    TooFewFields { line: usize, found: usize },
    #[error("Invalid position '{0}': must be a 1-based integer that fits in 32 bits")]
    InvalidPosition(String),
    #[error("Invalid value '{value}' for INFO field {key}")]
    InvalidInfoValue { key: String, value: String },
    #[error("Invalid value '{value}' for FORMAT field {key}")]
    InvalidSampleValue { key: String, value: String },
    #[error("Unsupported encoding for INFO field {key}: got {found}")]
    UnsupportedEncoding { key: String, found: &'static str },
    #[error("Sink rejected variant: {0}")]
    Sink(BoxError),
}

/// Failure of an import pass, carrying how far the pass got.
#[derive(Error, Debug)]
#[error("import stopped after {} variants ({} passed): {source}", .summary.total_variants, .summary.passed_variants)]
pub struct ImportError {
    pub summary: VcfSummary,
    #[source]
    pub source: VcfError,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("Number '{0}' in query does not fit in a 32-bit signed integer")]
    NumberOutOfRange(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Variant {0} already exists")]
    Conflict(String),
    #[error("Variant store lock was poisoned")]
    Poisoned,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid variant snapshot at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
