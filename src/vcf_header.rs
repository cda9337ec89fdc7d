use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static INFO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##INFO=<ID=([^,>]+),Number=([^,>]+),Type=([^,>]+)").expect("valid INFO regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoType {
    Integer,
    Float,
    Flag,
    Character,
    String,
}

impl InfoType {
    fn parse(s: &str) -> Self {
        match s {
            "Integer" => InfoType::Integer,
            "Float" => InfoType::Float,
            "Flag" => InfoType::Flag,
            "Character" => InfoType::Character,
            _ => InfoType::String,
        }
    }
}

/// Declared shape of one INFO key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoDefinition {
    pub number: String,
    pub value_type: InfoType,
}

impl InfoDefinition {
    /// True when the key holds at most one value per record.
    pub fn is_scalar(&self) -> bool {
        self.number == "1" || self.number == "0"
    }
}

#[derive(Debug, Clone, Default)]
pub struct VcfHeader {
    pub info: HashMap<String, InfoDefinition>,
    pub sample_names: Vec<String>,
}

impl VcfHeader {
    /// Registers a `##` meta line. Only INFO definitions are kept.
    pub fn add_meta_line(&mut self, line: &str) {
        if let Some(captures) = INFO_REGEX.captures(line) {
            let definition = InfoDefinition {
                number: captures[2].to_string(),
                value_type: InfoType::parse(&captures[3]),
            };
            self.info.insert(captures[1].to_string(), definition);
        }
    }

    /// Reads sample names from the `#CHROM` column line.
    pub fn set_columns(&mut self, line: &str) {
        self.sample_names = line.split('\t').skip(9).map(|s| s.to_string()).collect();
    }

    pub fn info_definition(&self, key: &str) -> Option<&InfoDefinition> {
        self.info.get(key)
    }

    pub fn total_samples(&self) -> usize {
        self.sample_names.len()
    }
}
