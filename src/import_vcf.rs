use std::io::{BufRead, Read};

use serde::Serialize;

use crate::error::{BoxError, ImportError, VcfError};
use crate::extract_sample_info::{DP, GQ};
use crate::info_field::InfoField;
use crate::normalize::RecordNormalizer;
use crate::read_vcf_gz::open_vcf_stream;
use crate::variant::Variant;
use crate::vcf_header::VcfHeader;
use crate::vcf_record::VcfRecord;

/// What to do with a record whose annotation has an unsupported encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnnotationPolicy {
    /// Log a warning and leave the record out of the passed count.
    #[default]
    Skip,
    /// Stop the import.
    Abort,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Keep only records whose FILTER is `PASS` or `.`.
    pub filter: bool,
    pub dataset_id: String,
    pub assembly_id: String,
    pub annotation_policy: AnnotationPolicy,
}

impl ImportOptions {
    pub fn new(dataset_id: &str, assembly_id: &str) -> Self {
        ImportOptions {
            filter: true,
            dataset_id: dataset_id.to_string(),
            assembly_id: assembly_id.to_string(),
            annotation_policy: AnnotationPolicy::default(),
        }
    }

    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_annotation_policy(mut self, policy: AnnotationPolicy) -> Self {
        self.annotation_policy = policy;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VcfSummary {
    pub total_variants: u64,
    pub passed_variants: u64,
}

/// Streams a VCF (plain or gzip) and hands every accepted variant to `sink`.
///
/// The pass stops at the first malformed record or sink failure; the error
/// carries the counts reached so far. Nothing already sunk is rolled back.
pub fn iterate_over<R, F, E>(
    reader: R,
    options: &ImportOptions,
    mut sink: F,
) -> Result<VcfSummary, ImportError>
where
    R: Read,
    F: FnMut(Variant) -> Result<(), E>,
    E: Into<BoxError>,
{
    let mut summary = VcfSummary::default();

    let result = open_vcf_stream(reader)
        .map_err(VcfError::from)
        .and_then(|stream| scan_records(stream, options, &mut summary, &mut sink));

    match result {
        Ok(()) => {
            log::info!(
                "Imported {} of {} variants into {}/{}",
                summary.passed_variants,
                summary.total_variants,
                options.dataset_id,
                options.assembly_id
            );
            Ok(summary)
        }
        Err(source) => Err(ImportError { summary, source }),
    }
}

fn scan_records<F, E>(
    stream: Box<dyn BufRead + '_>,
    options: &ImportOptions,
    summary: &mut VcfSummary,
    sink: &mut F,
) -> Result<(), VcfError>
where
    F: FnMut(Variant) -> Result<(), E>,
    E: Into<BoxError>,
{
    let mut header = VcfHeader::default();
    let mut normalizer: Option<RecordNormalizer> = None;

    for (index, line) in stream.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with("##") {
            header.add_meta_line(&line);
            continue;
        }
        if line.starts_with("#CHROM") {
            header.set_columns(&line);
            log::debug!(
                "Header parsed: {} INFO definitions, {} samples",
                header.info.len(),
                header.total_samples()
            );
            normalizer = Some(RecordNormalizer::new(
                &options.dataset_id,
                &options.assembly_id,
                header.total_samples(),
            ));
            continue;
        }

        let normalizer = normalizer.as_ref().ok_or(VcfError::MissingHeader)?;
        let record = VcfRecord::from_line(&line, line_number)?;
        summary.total_variants += 1;

        if options.filter && !record.is_pass() {
            continue;
        }

        let variant = match build_variant(normalizer, &header, &record) {
            Ok(variant) => variant,
            Err(VcfError::UnsupportedEncoding { key, found })
                if options.annotation_policy == AnnotationPolicy::Skip =>
            {
                log::warn!(
                    "Skipping {}:{} (line {line_number}): {key} has unsupported encoding {found}",
                    record.chromosome,
                    record.position
                );
                continue;
            }
            Err(e) => return Err(e),
        };

        sink(variant).map_err(|e| VcfError::Sink(e.into()))?;
        summary.passed_variants += 1;
    }

    if normalizer.is_none() {
        return Err(VcfError::MissingHeader);
    }

    Ok(())
}

fn build_variant(
    normalizer: &RecordNormalizer,
    header: &VcfHeader,
    record: &VcfRecord<'_>,
) -> Result<Variant, VcfError> {
    let info = InfoField::parse(record.info, header);
    let samples = record.format_samples();
    let depths = samples.get_integer_values(DP)?;
    let qualities = samples.get_integer_values(GQ)?;

    normalizer.normalize(record, &info, &depths, &qualities)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "##fileformat=VCFv4.2\n\
        ##INFO=<ID=NS,Number=1,Type=Integer,Description=\"Number of Samples\">\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n";

    fn vcf(records: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for record in records {
            text.push_str(record);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_filter_pass_and_missing() {
        let input = vcf(&[
            "1\t10\t.\tA\tG\t.\tPASS\tNS=2\tGT:DP\t0/1:10\t0/0:30",
            "1\t20\t.\tA\tG\t.\tFAIL\tNS=2\tGT:DP\t0/1:10\t0/0:30",
            "1\t30\t.\tA\tG\t.\t.\tNS=2\tGT:DP\t0/1:10\t0/0:30",
        ]);
        let mut seen = Vec::new();

        let summary = iterate_over(input.as_bytes(), &ImportOptions::new("d", "a"), |v| {
            seen.push(v);
            Ok::<(), BoxError>(())
        })
        .unwrap();

        assert_eq!(summary, VcfSummary { total_variants: 3, passed_variants: 2 });
        assert_eq!(seen.iter().map(|v| v.start).collect::<Vec<_>>(), vec![9, 29]);
        assert_eq!(seen[0].total_samples, 2);
        assert_eq!(seen[0].coverage.unwrap().mean, 20.0);
    }

    #[test]
    fn test_filter_disabled_accepts_everything() {
        let input = vcf(&[
            "1\t10\t.\tA\tG\t.\tPASS\t.",
            "1\t20\t.\tA\tG\t.\tLowQual\t.",
        ]);
        let options = ImportOptions::new("d", "a").with_filter(false);

        let summary = iterate_over(input.as_bytes(), &options, |_| Ok::<(), BoxError>(())).unwrap();

        assert_eq!(summary, VcfSummary { total_variants: 2, passed_variants: 2 });
    }

    #[test]
    fn test_sink_failure_stops_the_pass() {
        let input = vcf(&[
            "1\t10\t.\tA\tG\t.\tPASS\t.",
            "1\t20\t.\tA\tG\t.\tPASS\t.",
            "1\t30\t.\tA\tG\t.\tPASS\t.",
        ]);
        let mut calls = 0;

        let err = iterate_over(input.as_bytes(), &ImportOptions::new("d", "a"), |_| {
            calls += 1;
            if calls == 2 {
                Err("store unavailable")
            } else {
                Ok(())
            }
        })
        .unwrap_err();

        assert_eq!(calls, 2);
        assert_eq!(err.summary, VcfSummary { total_variants: 2, passed_variants: 1 });
        assert!(matches!(err.source, VcfError::Sink(_)));
    }

    #[test]
    fn test_malformed_record_keeps_partial_summary() {
        let input = vcf(&["1\t10\t.\tA\tG\t.\tPASS\t.", "1\tnot-a-number\t.\tA\tG\t.\tPASS\t."]);

        let err = iterate_over(input.as_bytes(), &ImportOptions::new("d", "a"), |_| {
            Ok::<(), BoxError>(())
        })
        .unwrap_err();

        assert_eq!(err.summary, VcfSummary { total_variants: 2, passed_variants: 1 });
        assert!(matches!(err.source, VcfError::InvalidPosition(_)));
    }

    #[test]
    fn test_unsupported_annotation_policy() {
        let input = vcf(&["1\t10\t.\tA\tG\t.\tPASS\tANN", "1\t20\t.\tA\tG\t.\tPASS\t."]);

        let summary = iterate_over(input.as_bytes(), &ImportOptions::new("d", "a"), |_| {
            Ok::<(), BoxError>(())
        })
        .unwrap();
        assert_eq!(summary, VcfSummary { total_variants: 2, passed_variants: 1 });

        let options = ImportOptions::new("d", "a").with_annotation_policy(AnnotationPolicy::Abort);
        let err = iterate_over(input.as_bytes(), &options, |_| Ok::<(), BoxError>(())).unwrap_err();
        assert_eq!(err.summary, VcfSummary { total_variants: 1, passed_variants: 0 });
        assert!(matches!(err.source, VcfError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_missing_header() {
        let err = iterate_over("1\t10\t.\tA\tG\t.\tPASS\t.\n".as_bytes(), &ImportOptions::new("d", "a"), |_| {
            Ok::<(), BoxError>(())
        })
        .unwrap_err();
        assert!(matches!(err.source, VcfError::MissingHeader));
        assert_eq!(err.summary, VcfSummary::default());

        let err = iterate_over("".as_bytes(), &ImportOptions::new("d", "a"), |_| Ok::<(), BoxError>(()))
            .unwrap_err();
        assert!(matches!(err.source, VcfError::MissingHeader));
    }
}
