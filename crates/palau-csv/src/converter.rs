use crate::{
    config::CsvOptions,
    errors::{CsvError, CsvResult},
    headers::normalize_headers,
    reader::{tokenize, RawTable},
    records::{assemble_records, ProcessingResult},
};
use futures::{Stream, TryStreamExt};
use std::{io, path::Path};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

/// CSV to JSON-ready records with normalized headers
///
/// Holds default [`CsvOptions`]; every entry point takes call-scoped options
/// that are merged over them for that call only. The instance itself is never
/// modified, so one converter can serve any number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct CsvToJson {
    options: CsvOptions,
}

impl CsvToJson {
    /// Create a converter with the given default options
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    /// The default options of this converter
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// A new converter whose defaults are this converter's merged with `overrides`
    pub fn with_options(&self, overrides: &CsvOptions) -> Self {
        Self::new(self.options.merged(overrides))
    }

    /// The underlying `csv` reader configuration, for callers that want raw records
    pub fn reader_builder(&self) -> CsvResult<csv::ReaderBuilder> {
        self.options.to_reader_builder()
    }

    /// Convert CSV text held in memory
    pub fn convert_str(&self, text: &str, options: &CsvOptions) -> CsvResult<ProcessingResult> {
        self.process(text, options)
    }

    /// Convert a CSV file
    pub async fn convert_file<P: AsRef<Path>>(
        &self,
        path: P,
        options: &CsvOptions,
    ) -> CsvResult<ProcessingResult> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CsvError::File {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read file");

        self.process(&String::from_utf8(bytes)?, options)
    }

    /// Convert everything `reader` yields until end of input
    ///
    /// The whole input is buffered before parsing starts; a read error fails
    /// the call without a partial result.
    pub async fn convert_reader<R>(
        &self,
        mut reader: R,
        options: &CsvOptions,
    ) -> CsvResult<ProcessingResult>
    where
        R: AsyncRead + Unpin,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        debug!(bytes = bytes.len(), "buffered reader");

        self.process(&String::from_utf8(bytes)?, options)
    }

    /// Convert a stream of byte chunks, concatenated in arrival order
    ///
    /// The stream is drained completely before parsing starts; the first
    /// error chunk fails the call without a partial result.
    pub async fn convert_stream<S, B>(
        &self,
        stream: S,
        options: &CsvOptions,
    ) -> CsvResult<ProcessingResult>
    where
        S: Stream<Item = io::Result<B>>,
        B: AsRef<[u8]>,
    {
        let bytes = stream
            .try_fold(Vec::new(), |mut buffer, chunk| async move {
                buffer.extend_from_slice(chunk.as_ref());
                Ok::<_, io::Error>(buffer)
            })
            .await?;
        debug!(bytes = bytes.len(), "buffered stream");

        self.process(&String::from_utf8(bytes)?, options)
    }

    fn process(&self, text: &str, options: &CsvOptions) -> CsvResult<ProcessingResult> {
        let options = self.options.merged(options);
        let table = tokenize(text, &options)?;
        Ok(build_result(table))
    }
}

fn build_result(table: RawTable) -> ProcessingResult {
    let width = table.width();
    let RawTable { mut header, rows } = table;

    // Cells beyond the header row get placeholder columns of their own.
    if header.len() < width {
        warn!(
            header_columns = header.len(),
            widest_row = width,
            "rows wider than the header row; adding blank columns"
        );
        header.resize(width, String::new());
    }

    let headers = normalize_headers(&header);
    let data = assemble_records(&headers, rows);
    debug!(columns = headers.len(), records = data.len(), "assembled records");

    ProcessingResult { headers, data }
}
