/*!
# Tokenizing

A single pass over the input text with the `csv` crate, keeping the first row
apart as the raw header row. Header handling never goes back to the text.

The `csv` reader accepts a quoted field that is still open at end of input
and silently takes the rest of the text as its value; [`tokenize`] rejects
that input up front instead.
*/

use crate::{
    config::{CsvOptions, Dialect},
    errors::{CsvError, CsvResult},
};
use tracing::debug;

/// Raw cells as they appear in the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Widest row, header included
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Split `text` into a raw header row and raw data rows
pub fn tokenize(text: &str, options: &CsvOptions) -> CsvResult<RawTable> {
    check_quotes(text, &options.dialect()?)?;

    let mut reader = options.to_reader_builder()?.from_reader(text.as_bytes());
    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => return Ok(RawTable::default()),
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    debug!(columns = header.len(), rows = rows.len(), "tokenized input");
    Ok(RawTable { header, rows })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    RecordStart,
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
    Escaped,
    Comment,
}

/// Fail on a quoted field that never closes, following the `csv` reader's state machine
fn check_quotes(text: &str, dialect: &Dialect) -> CsvResult<()> {
    if !dialect.quoting {
        return Ok(());
    }

    let is_terminator = |b: u8| match dialect.terminator {
        Some(terminator) => b == terminator,
        None => b == b'\n' || b == b'\r',
    };

    let mut state = QuoteState::RecordStart;
    let mut line: u64 = 1;
    let mut opened_on: u64 = 1;

    for &b in text.as_bytes() {
        state = match state {
            QuoteState::RecordStart if dialect.comment == Some(b) => QuoteState::Comment,
            QuoteState::RecordStart | QuoteState::FieldStart => {
                if b == dialect.quote {
                    opened_on = line;
                    QuoteState::Quoted
                } else if b == dialect.delimiter {
                    QuoteState::FieldStart
                } else if is_terminator(b) {
                    QuoteState::RecordStart
                } else {
                    QuoteState::Unquoted
                }
            }
            QuoteState::Unquoted => {
                if b == dialect.delimiter {
                    QuoteState::FieldStart
                } else if is_terminator(b) {
                    QuoteState::RecordStart
                } else {
                    QuoteState::Unquoted
                }
            }
            QuoteState::Quoted => {
                if b == dialect.quote {
                    QuoteState::QuoteInQuoted
                } else if dialect.escape == Some(b) {
                    QuoteState::Escaped
                } else {
                    QuoteState::Quoted
                }
            }
            QuoteState::Escaped => QuoteState::Quoted,
            QuoteState::QuoteInQuoted => {
                if dialect.double_quote && b == dialect.quote {
                    QuoteState::Quoted
                } else if b == dialect.delimiter {
                    QuoteState::FieldStart
                } else if is_terminator(b) {
                    QuoteState::RecordStart
                } else {
                    QuoteState::Unquoted
                }
            }
            QuoteState::Comment if b == b'\n' => QuoteState::RecordStart,
            QuoteState::Comment => QuoteState::Comment,
        };

        if b == b'\n' {
            line += 1;
        }
    }

    match state {
        QuoteState::Quoted | QuoteState::Escaped => {
            Err(CsvError::UnterminatedQuote { line: opened_on })
        }
        _ => Ok(()),
    }
}
