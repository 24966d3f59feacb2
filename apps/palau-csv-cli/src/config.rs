use crate::error::{CliError, CliResult};
use palau_csv::CsvOptions;
use std::path::Path;

/// Load default parsing options from a YAML or JSON file, chosen by extension
pub fn load_options(path: &Path) -> CliResult<CsvOptions> {
    let contents = std::fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
        Some("json") => Ok(serde_json::from_str(&contents)?),
        _ => Err(CliError::InvalidConfig(format!(
            "{}: expected a .yaml, .yml or .json file",
            path.display()
        ))),
    }
}

/// Parse a delimiter argument; `tab` and `\t` stand for a tab character
pub fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c),
                _ => Err(format!(
                    "delimiter must be a single ASCII character or `tab`, got {:?}",
                    value
                )),
            }
        }
    }
}
