use crate::headers::clean_header_title;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One data row keyed by normalized header, in column order
pub type Record = IndexMap<String, String>;

/// Normalized headers plus one record per data row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub headers: Vec<String>,
    pub data: Vec<Record>,
}

impl ProcessingResult {
    /// Headers with the blank/duplicate naming convention stripped
    pub fn cleaned_headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|header| clean_header_title(header))
            .collect()
    }
}

/// Zip each raw row against the headers, positionally
///
/// A short row yields a record with fewer keys; cells past the last header
/// are dropped. Present-but-empty cells are kept as `""`.
pub fn assemble_records(headers: &[String], rows: Vec<Vec<String>>) -> Vec<Record> {
    rows.into_iter()
        .map(|row| {
            headers
                .iter()
                .cloned()
                .zip(row)
                .collect::<Record>()
        })
        .collect()
}
