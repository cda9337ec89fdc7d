use crate::error::VcfError;

/// Per-sample read depth.
pub const DP: &str = "DP";
/// Per-sample conditional genotype quality.
pub const GQ: &str = "GQ";

/// FORMAT keys and the matching per-sample columns of one record.
#[derive(Debug, Clone, Default)]
pub struct ParsedFormatSample<'a> {
    pub format_keys: Vec<&'a str>,
    pub samples: Vec<Vec<&'a str>>,
}

impl<'a> ParsedFormatSample<'a> {
    /// Collects one integer per sample for `key`.
    ///
    /// Samples where the key is missing (`.` or a short column) are skipped.
    /// A key absent from FORMAT yields an empty vector.
    pub fn get_integer_values(&self, key: &str) -> Result<Vec<i32>, VcfError> {
        let Some(position) = self.format_keys.iter().position(|k| *k == key) else {
            return Ok(Vec::new());
        };

        let mut values = Vec::with_capacity(self.samples.len());
        for sample in &self.samples {
            match sample.get(position) {
                None | Some(&".") | Some(&"") => continue,
                Some(raw) => values.push(raw.parse::<i32>().map_err(|_| {
                    VcfError::InvalidSampleValue {
                        key: key.to_string(),
                        value: raw.to_string(),
                    }
                })?),
            }
        }

        Ok(values)
    }
}

pub fn parse_format_and_samples<'a>(
    format_field: Option<&'a str>,
    sample_fields: &[&'a str],
) -> ParsedFormatSample<'a> {
    let mut parsed = ParsedFormatSample::default();

    if let Some(format_str) = format_field {
        if format_str.trim().is_empty() || format_str == "." {
            return parsed;
        }

        parsed.format_keys = format_str.split(':').collect();
        parsed.samples = sample_fields
            .iter()
            .map(|sample| sample.split(':').collect())
            .collect();
    }

    parsed
}
