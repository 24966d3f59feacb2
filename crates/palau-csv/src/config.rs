use crate::errors::{CsvError, CsvResult};
use csv::{ReaderBuilder, Terminator, Trim};
use serde::{Deserialize, Serialize};

/// Parsing options shared by a [`CsvToJson`](crate::CsvToJson) instance and its calls
///
/// Every field is optional so that an instance's defaults and a call's
/// overrides can be layered with [`CsvOptions::merged`]. Unset fields fall back
/// to the usual RFC 4180 dialect.
///
/// Unknown keys are rejected when deserializing; only the typed options below
/// reach the engine. Other `csv` settings go through
/// [`CsvToJson::reader_builder`](crate::CsvToJson::reader_builder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvOptions {
    /// Field separator (`,` when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,

    /// Trim whitespace around every cell, header cells included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<bool>,

    /// Quote character (`"` when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<char>,

    /// Escape character inside quoted fields (none when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape: Option<char>,

    /// Whether two consecutive quotes inside a quoted field are a literal quote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_quote: Option<bool>,

    /// Whether quotes are recognised at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoting: Option<bool>,

    /// Lines starting with this character are skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<char>,

    /// Record terminator (CRLF or LF when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminator: Option<char>,
}

/// Fully resolved byte-level dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    pub escape: Option<u8>,
    pub double_quote: bool,
    pub quoting: bool,
    pub comment: Option<u8>,
    pub terminator: Option<u8>,
    pub trim: bool,
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_escape(mut self, escape: char) -> Self {
        self.escape = Some(escape);
        self
    }

    pub fn with_double_quote(mut self, double_quote: bool) -> Self {
        self.double_quote = Some(double_quote);
        self
    }

    pub fn with_quoting(mut self, quoting: bool) -> Self {
        self.quoting = Some(quoting);
        self
    }

    pub fn with_comment(mut self, comment: char) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn with_terminator(mut self, terminator: char) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Shallow merge: every field set in `overrides` wins, the rest comes from `self`
    pub fn merged(&self, overrides: &CsvOptions) -> CsvOptions {
        CsvOptions {
            delimiter: overrides.delimiter.or(self.delimiter),
            trim: overrides.trim.or(self.trim),
            quote: overrides.quote.or(self.quote),
            escape: overrides.escape.or(self.escape),
            double_quote: overrides.double_quote.or(self.double_quote),
            quoting: overrides.quoting.or(self.quoting),
            comment: overrides.comment.or(self.comment),
            terminator: overrides.terminator.or(self.terminator),
        }
    }

    pub(crate) fn dialect(&self) -> CsvResult<Dialect> {
        Ok(Dialect {
            delimiter: ascii_byte("delimiter", self.delimiter.unwrap_or(','))?,
            quote: ascii_byte("quote", self.quote.unwrap_or('"'))?,
            escape: self.escape.map(|c| ascii_byte("escape", c)).transpose()?,
            double_quote: self.double_quote.unwrap_or(true),
            quoting: self.quoting.unwrap_or(true),
            comment: self.comment.map(|c| ascii_byte("comment", c)).transpose()?,
            terminator: self
                .terminator
                .map(|c| ascii_byte("terminator", c))
                .transpose()?,
            trim: self.trim.unwrap_or(false),
        })
    }

    /// Configure a `csv` reader for these options
    ///
    /// The reader never treats the first row as a header and tolerates rows of
    /// differing length; header handling happens after tokenizing.
    pub fn to_reader_builder(&self) -> CsvResult<ReaderBuilder> {
        let dialect = self.dialect()?;

        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(dialect.delimiter)
            .quote(dialect.quote)
            .escape(dialect.escape)
            .double_quote(dialect.double_quote)
            .quoting(dialect.quoting)
            .comment(dialect.comment)
            .trim(if dialect.trim { Trim::All } else { Trim::None });

        if let Some(terminator) = dialect.terminator {
            builder.terminator(Terminator::Any(terminator));
        }

        Ok(builder)
    }
}

fn ascii_byte(name: &str, c: char) -> CsvResult<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CsvError::InvalidOption(format!(
            "{} must be a single ASCII character, got {:?}",
            name, c
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_overrides() {
        let base = CsvOptions::new().with_delimiter(';').with_trim(true);
        let overrides = CsvOptions::new().with_delimiter('\t');

        let merged = base.merged(&overrides);
        assert_eq!(merged.delimiter, Some('\t'));
        assert_eq!(merged.trim, Some(true));

        // Neither side is touched
        assert_eq!(base.delimiter, Some(';'));
        assert_eq!(overrides.trim, None);
    }

    #[test]
    fn test_merge_with_empty_overrides_is_identity() {
        let base = CsvOptions::new()
            .with_delimiter('|')
            .with_comment('#')
            .with_quoting(false);
        assert_eq!(base.merged(&CsvOptions::default()), base);
    }

    #[test]
    fn test_default_dialect() {
        let dialect = CsvOptions::default().dialect().unwrap();
        assert_eq!(dialect.delimiter, b',');
        assert_eq!(dialect.quote, b'"');
        assert_eq!(dialect.escape, None);
        assert!(dialect.double_quote);
        assert!(dialect.quoting);
        assert!(!dialect.trim);
        assert_eq!(dialect.terminator, None);
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let err = CsvOptions::new().with_delimiter('§').dialect().unwrap_err();
        assert!(matches!(err, CsvError::InvalidOption(_)));
        assert!(err.to_string().contains("delimiter"));

        assert!(CsvOptions::new().with_comment('é').to_reader_builder().is_err());
    }

    #[test]
    fn test_options_from_yaml() {
        let yaml = "delimiter: \";\"\ntrim: true\ncomment: \"#\"\n";
        let options: CsvOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            options,
            CsvOptions::new()
                .with_delimiter(';')
                .with_trim(true)
                .with_comment('#')
        );
    }

    #[test]
    fn test_unknown_option_key_is_rejected() {
        let result: Result<CsvOptions, _> = serde_json::from_str(r#"{"delimitr": ";"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let json = serde_json::to_string(&CsvOptions::new().with_trim(true)).unwrap();
        assert_eq!(json, r#"{"trim":true}"#);
    }
}
