use std::collections::HashMap;

use crate::error::VcfError;
use crate::vcf_header::{InfoType, VcfHeader};

/// Allele frequency for each ALT allele, in ALT order.
pub const AF: &str = "AF";
/// Number of samples with data.
pub const NS: &str = "NS";
/// Functional annotations (SnpEff).
pub const ANN: &str = "ANN";
/// Clinical significance.
pub const CLNSIG: &str = "CLNSIG";

/// A typed INFO value. The shape follows the header definition of the key;
/// keys without a definition are kept as a single string.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue<'a> {
    Flag,
    Integer(i32),
    Float(f32),
    String(&'a str),
    IntegerList(Vec<i32>),
    FloatList(Vec<f32>),
    StringList(Vec<&'a str>),
}

impl InfoValue<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            InfoValue::Flag => "flag",
            InfoValue::Integer(_) => "integer",
            InfoValue::Float(_) => "float",
            InfoValue::String(_) => "string",
            InfoValue::IntegerList(_) => "integer list",
            InfoValue::FloatList(_) => "float list",
            InfoValue::StringList(_) => "string list",
        }
    }
}

/// The INFO column of one record. Values are typed on access, so a malformed
/// value only fails the lookup that touches it.
#[derive(Debug)]
pub struct InfoField<'a> {
    values: HashMap<&'a str, Option<&'a str>>,
    header: &'a VcfHeader,
}

impl<'a> InfoField<'a> {
    pub fn parse(info: &'a str, header: &'a VcfHeader) -> Self {
        let mut values = HashMap::new();

        if info != "." {
            for pair in info.split(';').filter(|p| !p.is_empty()) {
                match pair.split_once('=') {
                    Some((key, value)) => values.insert(key, Some(value)),
                    None => values.insert(pair, None),
                };
            }
        }

        InfoField { values, header }
    }

    /// Looks up and types a key. A value of `.` counts as absent, and so does
    /// a numeric list with a `.` element (`AF=0.5,.`).
    pub fn get(&self, key: &str) -> Result<Option<InfoValue<'a>>, VcfError> {
        let raw = match self.values.get(key) {
            None => return Ok(None),
            Some(None) => return Ok(Some(InfoValue::Flag)),
            Some(Some(".")) => return Ok(None),
            Some(Some(raw)) => *raw,
        };

        let Some(definition) = self.header.info_definition(key) else {
            return Ok(Some(InfoValue::String(raw)));
        };

        let scalar = definition.is_scalar();
        let value = match definition.value_type {
            InfoType::Flag => InfoValue::Flag,
            InfoType::Integer if scalar => InfoValue::Integer(parse_number(key, raw)?),
            InfoType::Integer => match parse_list(key, raw.split(','))? {
                Some(values) => InfoValue::IntegerList(values),
                None => return Ok(None),
            },
            InfoType::Float if scalar => InfoValue::Float(parse_number(key, raw)?),
            InfoType::Float => match parse_list(key, raw.split(','))? {
                Some(values) => InfoValue::FloatList(values),
                None => return Ok(None),
            },
            InfoType::String | InfoType::Character if scalar => InfoValue::String(raw),
            InfoType::String | InfoType::Character => {
                InfoValue::StringList(raw.split(',').collect())
            }
        };

        Ok(Some(value))
    }

    pub fn get_float_list(&self, key: &str, default: Vec<f32>) -> Result<Vec<f32>, VcfError> {
        match self.get(key)? {
            None => Ok(default),
            Some(InfoValue::FloatList(values)) => Ok(values),
            Some(InfoValue::Float(value)) => Ok(vec![value]),
            Some(InfoValue::Integer(value)) => Ok(vec![value as f32]),
            Some(InfoValue::IntegerList(values)) => Ok(values.into_iter().map(|v| v as f32).collect()),
            Some(InfoValue::String(raw)) => Ok(parse_list(key, raw.split(','))?.unwrap_or(default)),
            Some(InfoValue::StringList(raw)) => Ok(parse_list(key, raw.into_iter())?.unwrap_or(default)),
            Some(other) => Err(VcfError::UnsupportedEncoding {
                key: key.to_string(),
                found: other.kind(),
            }),
        }
    }

    pub fn get_int(&self, key: &str, default: i32) -> Result<i32, VcfError> {
        match self.get(key)? {
            None => Ok(default),
            Some(InfoValue::Integer(value)) => Ok(value),
            Some(InfoValue::IntegerList(values)) if values.len() == 1 => Ok(values[0]),
            Some(InfoValue::String(raw)) => parse_number(key, raw),
            Some(other) => Err(VcfError::UnsupportedEncoding {
                key: key.to_string(),
                found: other.kind(),
            }),
        }
    }

    /// String lists are joined back with commas; non-string values yield the
    /// default.
    pub fn get_string(&self, key: &str, default: &str) -> Result<String, VcfError> {
        match self.get(key)? {
            Some(InfoValue::String(value)) => Ok(value.to_string()),
            Some(InfoValue::StringList(values)) => Ok(values.join(",")),
            _ => Ok(default.to_string()),
        }
    }
}

/// Parses every element, or returns `None` when any element is missing.
fn parse_list<'v, T: std::str::FromStr>(
    key: &str,
    elements: impl Iterator<Item = &'v str>,
) -> Result<Option<Vec<T>>, VcfError> {
    let mut values = Vec::new();
    for element in elements {
        if element.trim() == "." {
            return Ok(None);
        }
        values.push(parse_number(key, element)?);
    }
    Ok(Some(values))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, VcfError> {
    value.trim().parse::<T>().map_err(|_| VcfError::InvalidInfoValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> VcfHeader {
        let mut header = VcfHeader::default();
        header.add_meta_line(r#"##INFO=<ID=NS,Number=1,Type=Integer,Description="Number of Samples">"#);
        header.add_meta_line(r#"##INFO=<ID=AF,Number=A,Type=Float,Description="Allele Frequency">"#);
        header.add_meta_line(r#"##INFO=<ID=DB,Number=0,Type=Flag,Description="dbSNP membership">"#);
        header.add_meta_line(r#"##INFO=<ID=CLNSIG,Number=.,Type=String,Description="Clinical significance">"#);
        header
    }

    #[test]
    fn test_typed_values() {
        let header = header();
        let info = InfoField::parse("NS=3;AF=0.5,0.25;DB;CLNSIG=Benign,Likely_benign;XX=raw", &header);

        assert_eq!(info.get("NS").unwrap(), Some(InfoValue::Integer(3)));
        assert_eq!(info.get("AF").unwrap(), Some(InfoValue::FloatList(vec![0.5, 0.25])));
        assert_eq!(info.get("DB").unwrap(), Some(InfoValue::Flag));
        assert_eq!(
            info.get("CLNSIG").unwrap(),
            Some(InfoValue::StringList(vec!["Benign", "Likely_benign"]))
        );
        assert_eq!(info.get("XX").unwrap(), Some(InfoValue::String("raw")));
        assert_eq!(info.get("MISSING").unwrap(), None);
    }

    #[test]
    fn test_defaults_when_absent() {
        let header = header();
        let info = InfoField::parse(".", &header);

        assert!(info.get_float_list(AF, Vec::new()).unwrap().is_empty());
        assert_eq!(info.get_int(NS, 0).unwrap(), 0);
        assert_eq!(info.get_string(CLNSIG, "").unwrap(), "");
    }

    #[test]
    fn test_helpers() {
        let header = header();
        let info = InfoField::parse("NS=3;AF=0.5,0.25;CLNSIG=Benign,Likely_benign", &header);

        assert_eq!(info.get_float_list(AF, Vec::new()).unwrap(), vec![0.5, 0.25]);
        assert_eq!(info.get_int(NS, 0).unwrap(), 3);
        assert_eq!(info.get_string(CLNSIG, "").unwrap(), "Benign,Likely_benign");
    }

    #[test]
    fn test_undeclared_numbers_are_parsed_from_text() {
        let header = VcfHeader::default();
        let info = InfoField::parse("NS=12;AF=0.1", &header);

        assert_eq!(info.get_int(NS, 0).unwrap(), 12);
        assert_eq!(info.get_float_list(AF, Vec::new()).unwrap(), vec![0.1]);
    }

    #[test]
    fn test_missing_list_element_falls_back_to_default() {
        let header = header();
        let info = InfoField::parse("AF=0.5,.;NS=2", &header);

        assert_eq!(info.get("AF").unwrap(), None);
        assert!(info.get_float_list(AF, Vec::new()).unwrap().is_empty());
        assert_eq!(info.get_int(NS, 0).unwrap(), 2);

        let undeclared = VcfHeader::default();
        let info = InfoField::parse("AF=.,0.1", &undeclared);
        assert!(info.get_float_list(AF, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_number() {
        let header = header();
        let info = InfoField::parse("NS=three", &header);

        assert!(matches!(
            info.get_int(NS, 0),
            Err(VcfError::InvalidInfoValue { .. })
        ));
    }
}
