use std::io::Write;

use crate::variant::{Distribution, Variant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
    Tsv,
    Csv,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "console" => Some(OutputFormat::Console),
            "json" => Some(OutputFormat::Json),
            "tsv" => Some(OutputFormat::Tsv),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

pub const TABLE_HEADERS: [&str; 13] = [
    "dataset", "assembly", "ns", "total", "chrom", "pos", "id", "ref", "alt", "af", "dp", "gq",
    "gene",
];

pub fn write_variants<W: Write>(
    writer: &mut W,
    variants: &[Variant],
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Console => {
            for variant in variants {
                writeln!(writer, "{variant}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, variants)?;
            writeln!(writer)?;
        }
        OutputFormat::Tsv => write_tsv_content(writer, variants)?,
        OutputFormat::Csv => write_csv_content(writer, variants)?,
    }
    Ok(())
}

fn write_tsv_content<W: Write>(writer: &mut W, variants: &[Variant]) -> std::io::Result<()> {
    if variants.is_empty() {
        return Ok(());
    }

    writeln!(writer, "{}", TABLE_HEADERS.join("\t"))?;
    for v in variants {
        writeln!(writer, "{}", table_row(v).join("\t"))?;
    }

    Ok(())
}

fn write_csv_content<W: Write>(writer: &mut W, variants: &[Variant]) -> std::io::Result<()> {
    if variants.is_empty() {
        return Ok(());
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(TABLE_HEADERS)?;
    for v in variants {
        csv_writer.write_record(table_row(v))?;
    }
    csv_writer.flush()
}

/// `pos` is the 1-based VCF position.
fn table_row(v: &Variant) -> [String; 13] {
    [
        v.dataset_id.clone(),
        v.assembly_id.clone(),
        v.sample_count.to_string(),
        v.total_samples.to_string(),
        v.reference_name.clone(),
        (i64::from(v.start) + 1).to_string(),
        join_or_dot(&v.snp_ids),
        v.reference_bases.clone(),
        join_or_dot(&v.alternate_bases),
        join_or_dot(&v.allele_frequency.iter().map(|f| format!("{f:.6}")).collect::<Vec<_>>()),
        join_distribution(v.coverage.as_ref()),
        join_distribution(v.genotype_quality.as_ref()),
        join_or_dot(&v.gene_symbol),
    ]
}

fn join_or_dot(values: &[String]) -> String {
    if values.is_empty() {
        ".".to_string()
    } else {
        values.join(";")
    }
}

fn join_distribution(distribution: Option<&Distribution>) -> String {
    match distribution {
        Some(d) => format!(
            "{:.6};{:.6};{:.6};{:.6};{:.6};{:.6}",
            d.min, d.q25, d.median, d.q75, d.max, d.mean
        ),
        None => ".".to_string(),
    }
}
