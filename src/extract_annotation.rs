use crate::error::VcfError;
use crate::info_field::{InfoField, InfoValue, ANN};

/// ANN column holding the gene symbol, one per annotation group.
pub const GENE_SYMBOL: usize = 3;
/// ANN column holding the variant type.
pub const TYPE: usize = 5;
/// ANN column holding the HGVS nomenclature.
pub const HGVS: usize = 9;

/// Selects column `index` from every `ANN` annotation group, in source order.
///
/// The annotation may arrive as one comma-separated string or as a list of
/// groups, depending on how the header declares it. A missing key yields an
/// empty vector; a group too short for `index` yields an empty string.
pub fn get_annotation_column(info: &InfoField<'_>, index: usize) -> Result<Vec<String>, VcfError> {
    let groups: Vec<&str> = match info.get(ANN)? {
        None => return Ok(Vec::new()),
        Some(InfoValue::String(ann)) => ann.split(',').collect(),
        Some(InfoValue::StringList(ann)) => ann,
        Some(other) => {
            return Err(VcfError::UnsupportedEncoding {
                key: ANN.to_string(),
                found: other.kind(),
            })
        }
    };

    Ok(groups
        .into_iter()
        .map(|group| group.split('|').nth(index).unwrap_or("").to_string())
        .collect())
}
