use clap::{Parser, Subcommand};
use sheetsift::api::ApiConfig;
use sheetsift::cli;
use sheetsift::error::SiftResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetsift")]
#[command(about = "Keep only the spreadsheet columns you pick.")]
#[command(long_about = "Sheetsift - spreadsheet column filter

Reads the first sheet of an .xlsx workbook, keeps the columns whose
row-1 header matches one of the selected names, and writes a new
workbook with a single \"Filtered Data\" sheet. Every row is kept,
in the original order; columns keep their source order.

COMMANDS:
  headers   - List the header names of the first sheet
  filter    - Write a workbook containing only the selected columns
  serve     - Run the HTTP upload/download server

EXAMPLES:
  sheetsift headers sales.xlsx
  sheetsift filter sales.xlsx --fields Name,Date
  sheetsift filter sales.xlsx out.xlsx -f Name -f Amount
  sheetsift serve --port 3000")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the header names of the first sheet
    Headers {
        /// Path to Excel file (.xlsx)
        file: PathBuf,
    },

    #[command(long_about = "Write a workbook containing only the selected columns.

Header names are matched exactly (no trimming, no case folding).
A header that appears more than once is kept every time it appears.
Names that match no header are ignored.

EXAMPLE:
  sheetsift filter sales.xlsx --fields Name,Date
  → writes filtered_sales.xlsx next to sales.xlsx")]
    /// Keep only the selected columns
    Filter {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Output Excel file path (default: filtered_<input> next to the input)
        output: Option<PathBuf>,

        /// Header names to keep (comma separated or repeated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Show matched columns
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the HTTP server
    Serve {
        /// Host address to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEETSIFT_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "SHEETSIFT_PORT")]
        port: u16,

        /// Largest accepted upload, in MiB
        #[arg(long, default_value = "25", env = "SHEETSIFT_MAX_UPLOAD_MB")]
        max_upload_mb: usize,
    },
}

fn main() -> SiftResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Headers { file } => cli::headers(file),

        Commands::Filter {
            input,
            output,
            fields,
            verbose,
        } => cli::filter(input, output, fields, verbose),

        Commands::Serve {
            host,
            port,
            max_upload_mb,
        } => cli::serve(ApiConfig {
            host,
            port,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        }),
    }
}
