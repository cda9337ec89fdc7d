use serde::{Deserialize, Serialize};
use std::fmt;

/// A genomic variant: annotated, sample columns dropped, per-sample metrics
/// reduced to distributions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub dataset_id: String,
    pub total_samples: i32,
    pub assembly_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snp_ids: Vec<String>,
    pub reference_name: String,
    /// 0-based position
    pub start: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference_bases: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_bases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gene_symbol: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allele_frequency: Vec<f32>,
    #[serde(default)]
    pub sample_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genotype_quality: Option<Distribution>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub clnsig: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hgvs: Vec<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub variant_type: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub mean: f64,
}

impl Variant {
    /// Deterministic identity: two records with the same scope, position and
    /// alleles map to the same id.
    pub fn canonical_id(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}-{}",
            self.dataset_id,
            self.assembly_id,
            self.reference_name,
            self.start,
            self.reference_bases,
            self.alternate_bases.join("_")
        )
    }
}

/// One line per variant, with the 1-based VCF position.
impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}:{} ({}/{}) {:?} {} > {:?} (AF={:?} DP={{{}}} GQ={{{}}} GENES={:?} CLNSIG={} HGVS={:?} TYPE={:?})",
            self.dataset_id,
            self.assembly_id,
            self.reference_name,
            i64::from(self.start) + 1,
            self.sample_count,
            self.total_samples,
            self.snp_ids,
            self.reference_bases,
            self.alternate_bases,
            self.allele_frequency,
            DisplayDistribution(self.coverage.as_ref()),
            DisplayDistribution(self.genotype_quality.as_ref()),
            self.gene_symbol,
            self.clnsig,
            self.hgvs,
            self.variant_type,
        )
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min={:.2} q25={:.2} median={:.2} q75={:.2} max={:.2} mean={:.2}",
            self.min, self.q25, self.median, self.q75, self.max, self.mean
        )
    }
}

struct DisplayDistribution<'a>(Option<&'a Distribution>);

impl fmt::Display for DisplayDistribution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(d) => d.fmt(f),
            None => Ok(()),
        }
    }
}
