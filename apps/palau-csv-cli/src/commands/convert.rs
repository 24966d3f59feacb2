use crate::{config::load_options, error::CliResult};
use palau_csv::{CsvOptions, CsvToJson, ProcessingResult};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

pub struct ConvertArgs {
    pub input: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub trim: Option<bool>,
    pub comment: Option<char>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub pretty: bool,
    pub clean_headers: bool,
}

impl ConvertArgs {
    /// Options given on the command line; they win over the config file
    fn call_options(&self) -> CsvOptions {
        CsvOptions {
            delimiter: self.delimiter,
            trim: self.trim,
            comment: self.comment,
            ..Default::default()
        }
    }
}

/// Convert CSV to JSON
pub async fn execute(args: ConvertArgs) -> CliResult<()> {
    let defaults = match &args.config {
        Some(path) => load_options(path)?,
        None => CsvOptions::default(),
    };
    let converter = CsvToJson::new(defaults);
    let call_options = args.call_options();

    let mut result = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            info!(input = %path.display(), "converting file");
            converter.convert_file(path, &call_options).await?
        }
        _ => {
            info!("converting stdin");
            converter
                .convert_reader(tokio::io::stdin(), &call_options)
                .await?
        }
    };

    if args.clean_headers {
        result.headers = result.cleaned_headers();
    }

    let json = render(&result, args.pretty)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!(output = %path.display(), records = result.data.len(), "wrote JSON");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

fn render(result: &ProcessingResult, pretty: bool) -> CliResult<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    json.push('\n');
    Ok(json)
}
