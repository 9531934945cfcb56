//! Sheetsift API Server binary
//!
//! HTTP endpoint for filtering uploaded workbooks down to selected columns.

use clap::Parser;
use sheetsift::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "sheetsift-server")]
#[command(version)]
#[command(about = "Sheetsift API Server - keep only the spreadsheet columns you pick")]
#[command(long_about = r#"
Sheetsift API Server

Endpoints:
  - POST /api/filter-excel - multipart `file` (.xlsx) + `fields` (JSON array of headers)
                             → filtered .xlsx download
  - POST /api/v1/filter    - same as /api/filter-excel
  - POST /api/headers      - multipart `file` → header names of the first sheet

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  sheetsift-server                           # Start on localhost:8080
  sheetsift-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/filter-excel \
    -F file=@sales.xlsx -F 'fields=["Name","Date"]' -OJ
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEETSIFT_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SHEETSIFT_PORT")]
    port: u16,

    /// Largest accepted upload, in MiB
    #[arg(long, default_value = "25", env = "SHEETSIFT_MAX_UPLOAD_MB")]
    max_upload_mb: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes: args.max_upload_mb * 1024 * 1024,
    };

    run_api_server(config).await
}
