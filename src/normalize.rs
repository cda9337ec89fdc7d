use crate::distribution::calculate_distribution;
use crate::error::VcfError;
use crate::extract_annotation::{get_annotation_column, GENE_SYMBOL, HGVS, TYPE};
use crate::info_field::{InfoField, AF, CLNSIG, NS};
use crate::variant::Variant;
use crate::vcf_record::VcfRecord;

/// Builds canonical variants for one dataset and assembly.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    pub dataset_id: String,
    pub assembly_id: String,
    pub total_samples: i32,
}

impl RecordNormalizer {
    pub fn new(dataset_id: &str, assembly_id: &str, total_samples: usize) -> Self {
        RecordNormalizer {
            dataset_id: dataset_id.to_string(),
            assembly_id: assembly_id.to_string(),
            total_samples: i32::try_from(total_samples).unwrap_or(i32::MAX),
        }
    }

    /// The returned variant has no id; the owning service assigns it.
    pub fn normalize(
        &self,
        record: &VcfRecord<'_>,
        info: &InfoField<'_>,
        depths: &[i32],
        qualities: &[i32],
    ) -> Result<Variant, VcfError> {
        Ok(Variant {
            id: String::new(),
            dataset_id: self.dataset_id.clone(),
            total_samples: self.total_samples,
            assembly_id: self.assembly_id.clone(),
            snp_ids: split_snp_ids(record.id),
            reference_name: normalize_chromosome(record.chromosome).to_string(),
            start: zero_based_start(record.position)?,
            reference_bases: record.reference.to_string(),
            alternate_bases: split_alternates(record.alternate),
            gene_symbol: get_annotation_column(info, GENE_SYMBOL)?,
            allele_frequency: info.get_float_list(AF, Vec::new())?,
            sample_count: info.get_int(NS, 0)?,
            coverage: calculate_distribution(depths),
            genotype_quality: calculate_distribution(qualities),
            clnsig: info.get_string(CLNSIG, "")?,
            hgvs: get_annotation_column(info, HGVS)?,
            variant_type: get_annotation_column(info, TYPE)?,
        })
    }
}

/// VCF IDs are semicolon separated; `.` means none.
pub fn split_snp_ids(id: &str) -> Vec<String> {
    if id == "." || id.is_empty() {
        return Vec::new();
    }
    id.split(';').map(|s| s.to_string()).collect()
}

pub fn normalize_chromosome(chr: &str) -> &str {
    chr.strip_prefix("chr").unwrap_or(chr)
}

fn split_alternates(alternate: &str) -> Vec<String> {
    if alternate == "." || alternate.is_empty() {
        return Vec::new();
    }
    alternate.split(',').map(|s| s.to_string()).collect()
}

fn zero_based_start(position: &str) -> Result<i32, VcfError> {
    position
        .parse::<i32>()
        .ok()
        .filter(|pos| *pos >= 1)
        .map(|pos| pos - 1)
        .ok_or_else(|| VcfError::InvalidPosition(position.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcf_header::VcfHeader;

    #[test]
    fn test_normalize_record() {
        let mut header = VcfHeader::default();
        header.add_meta_line(r#"##INFO=<ID=AF,Number=A,Type=Float,Description="Allele Frequency">"#);
        header.add_meta_line(r#"##INFO=<ID=NS,Number=1,Type=Integer,Description="Number of Samples">"#);

        let line = "chr1\t7737651\trs1;rs2\tA\tG,T\t50\tPASS\tNS=2;AF=0.25,0.5;CLNSIG=Benign;\
                    ANN=G|missense_variant|MODERATE|CAMTA1|g1|transcript|t1|protein_coding|1/2|c.1A>G,\
                    T|synonymous_variant|LOW|CAMTA1|g1|transcript|t1|protein_coding|1/2|c.1A>T";
        let record = VcfRecord::from_line(line, 1).unwrap();
        let info = InfoField::parse(record.info, &header);

        let normalizer = RecordNormalizer::new("bipmed", "hg38", 3);
        let variant = normalizer.normalize(&record, &info, &[10, 20], &[]).unwrap();

        assert!(variant.id.is_empty());
        assert_eq!(variant.dataset_id, "bipmed");
        assert_eq!(variant.assembly_id, "hg38");
        assert_eq!(variant.total_samples, 3);
        assert_eq!(variant.snp_ids, vec!["rs1", "rs2"]);
        assert_eq!(variant.reference_name, "1");
        assert_eq!(variant.start, 7737650);
        assert_eq!(variant.alternate_bases, vec!["G", "T"]);
        assert_eq!(variant.gene_symbol, vec!["CAMTA1", "CAMTA1"]);
        assert_eq!(variant.variant_type, vec!["transcript", "transcript"]);
        assert_eq!(variant.hgvs, vec!["c.1A>G", "c.1A>T"]);
        assert_eq!(variant.allele_frequency, vec![0.25, 0.5]);
        assert_eq!(variant.sample_count, 2);
        assert_eq!(variant.clnsig, "Benign");
        assert_eq!(variant.coverage.unwrap().median, 15.0);
        assert!(variant.genotype_quality.is_none());
    }

    #[test]
    fn test_defaults_without_info() {
        let header = VcfHeader::default();
        let record = VcfRecord::from_line("2\t1\t.\tC\tA\t.\t.\t.", 1).unwrap();
        let info = InfoField::parse(record.info, &header);

        let variant = RecordNormalizer::new("d", "a", 0)
            .normalize(&record, &info, &[], &[])
            .unwrap();

        assert!(variant.snp_ids.is_empty());
        assert_eq!(variant.start, 0);
        assert!(variant.gene_symbol.is_empty());
        assert!(variant.hgvs.is_empty());
        assert!(variant.allele_frequency.is_empty());
        assert_eq!(variant.sample_count, 0);
        assert!(variant.coverage.is_none());
        assert_eq!(variant.clnsig, "");
    }

    #[test]
    fn test_chromosome_prefix() {
        assert_eq!(normalize_chromosome("chrX"), "X");
        assert_eq!(normalize_chromosome("X"), "X");
        assert_eq!(normalize_chromosome("Chr2"), "Chr2");
        assert_eq!(normalize_chromosome("chrchr1"), "chr1");
    }

    #[test]
    fn test_invalid_position() {
        assert!(zero_based_start("0").is_err());
        assert!(zero_based_start("abc").is_err());
        assert!(zero_based_start("4294967296").is_err());
        assert_eq!(zero_based_start("1").unwrap(), 0);
    }
}
