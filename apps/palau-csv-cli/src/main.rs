use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "palau-csv")]
#[command(about = "Palau CSV - CSV to JSON records with normalized headers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file (or stdin) to JSON
    Convert {
        /// Input CSV file; `-` or nothing reads stdin
        input: Option<PathBuf>,

        /// Field delimiter (`tab` for TSV)
        #[arg(short, long, value_parser = config::parse_delimiter)]
        delimiter: Option<char>,

        /// Trim whitespace around headers and values; `--trim=false` overrides the config file
        #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        trim: Option<bool>,

        /// Skip lines starting with this character
        #[arg(long)]
        comment: Option<char>,

        /// YAML or JSON file with default parsing options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,

        /// Report header titles with the blank/duplicate naming stripped
        #[arg(long)]
        clean_headers: bool,
    },

    /// Strip the blank/duplicate naming convention from header titles
    CleanHeader {
        /// Normalized header titles
        #[arg(required = true)]
        headers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            delimiter,
            trim,
            comment,
            config,
            output,
            pretty,
            clean_headers,
        } => {
            commands::convert::execute(commands::convert::ConvertArgs {
                input,
                delimiter,
                trim,
                comment,
                config,
                output,
                pretty,
                clean_headers,
            })
            .await
        }

        Commands::CleanHeader { headers } => commands::clean_header::execute(&headers),
    }
}
