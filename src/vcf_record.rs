use crate::error::VcfError;
use crate::extract_sample_info::{parse_format_and_samples, ParsedFormatSample};

/// One data line of a VCF, split into columns without copying.
#[derive(Debug, Clone)]
pub struct VcfRecord<'a> {
    pub chromosome: &'a str,
    pub position: &'a str,
    pub id: &'a str,
    pub reference: &'a str,
    pub alternate: &'a str,
    pub quality: &'a str,
    pub filter: &'a str,
    pub info: &'a str,
    pub format: Option<&'a str>,
    pub samples: Vec<&'a str>,
}

impl<'a> VcfRecord<'a> {
    pub fn from_line(line: &'a str, line_number: usize) -> Result<Self, VcfError> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < 8 {
            return Err(VcfError::TooFewFields {
                line: line_number,
                found: fields.len(),
            });
        }

        let format = fields.get(8).copied().filter(|f| !f.is_empty() && *f != ".");
        let samples = if fields.len() > 9 {
            fields[9..].to_vec()
        } else {
            Vec::new()
        };

        Ok(VcfRecord {
            chromosome: fields[0],
            position: fields[1],
            id: fields[2],
            reference: fields[3],
            alternate: fields[4],
            quality: fields[5],
            filter: fields[6],
            info: fields[7],
            format,
            samples,
        })
    }

    /// FILTER is `PASS` or missing.
    pub fn is_pass(&self) -> bool {
        self.filter == "PASS" || self.filter == "."
    }

    pub fn format_samples(&self) -> ParsedFormatSample<'a> {
        parse_format_and_samples(self.format, &self.samples)
    }
}
