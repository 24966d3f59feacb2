/*!
# Palau CSV

Turns delimited text into JSON-ready records keyed by the header row, after
making the header row safe to use as keys.

## Header Normalization

Real-world exports often have headers that cannot be used as keys as is:

- empty headers, or engine placeholders like `field1`, become `blank_<i>`
- repeated headers become `duplicate_<i>_<header>`

`<i>` is the zero-based column position. [`clean_header_title`] maps a
normalized header back to what the file said.

## Records

Each data row becomes one [`Record`], keys in column order. Short rows yield
fewer keys; rows wider than the header row get `blank_<i>` columns. All values
stay strings.

## Usage

```rust
use palau_csv::{CsvOptions, CsvResult, CsvToJson};

fn example() -> CsvResult<()> {
    let converter = CsvToJson::new(CsvOptions::new().with_trim(true));

    let result = converter.convert_str("name,,name\nJohn,25,Smith", &CsvOptions::default())?;
    assert_eq!(result.headers, vec!["duplicate_0_name", "blank_1", "duplicate_2_name"]);
    assert_eq!(result.data[0]["blank_1"], "25");

    // Per-call options win over the converter's defaults for that call only
    let tsv = converter.convert_str("a\tb\n1\t2", &CsvOptions::new().with_delimiter('\t'))?;
    assert_eq!(tsv.headers, vec!["a", "b"]);

    Ok(())
}
# example().unwrap();
```

Files, `AsyncRead` sources and chunk streams go through
[`CsvToJson::convert_file`], [`CsvToJson::convert_reader`] and
[`CsvToJson::convert_stream`]; each buffers its whole input before parsing.
*/

pub mod config;
pub mod converter;
pub mod errors;
pub mod headers;
pub mod reader;
pub mod records;

// Re-export main types for convenience
pub use config::CsvOptions;
pub use converter::CsvToJson;
pub use errors::{CsvError, CsvResult};
pub use headers::{clean_header_title, is_blank_header, normalize_headers};
pub use reader::{tokenize, RawTable};
pub use records::{assemble_records, ProcessingResult, Record};
