//! sizepivot API server binary
//!
//! HTTP API for pivoting order spreadsheets.

use clap::Parser;
use sizepivot::api::{run_api_server, ApiConfig};
use sizepivot::config::PivotConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sizepivot-server")]
#[command(version)]
#[command(author = "RoyalBit Inc. <admin@royalbit.ca>")]
#[command(about = "sizepivot API server - HTTP API for size-run pivots")]
#[command(long_about = r#"
sizepivot API server

Endpoints:
  - POST /api/v1/pivot    - Pivot a spreadsheet (body: .xlsx, response: .xlsx)
  - POST /api/v1/clean    - Clean size labels only (body: .xlsx, response: .xlsx)
  - POST /api/v1/preview  - Pivot and return the first rows as JSON

Additional endpoints:
  - GET  /health          - Health check
  - GET  /version         - Server version info
  - GET  /                - API documentation

Query options (all endpoints under /api/v1):
  keys=Season,Style Number   size_column=Size   qty_column=Qty   sheet=Orders
  color_code   keep_zeros   keep_empty_sizes   sort_groups   check_consistency
    (flags: bare `?keep_zeros` or `keep_zeros=true` / `keep_zeros=false`)
  rows=N (preview only)

Example usage:
  sizepivot-server                           # Start on localhost:8080
  sizepivot-server --host 0.0.0.0 --port 3000 --config sizepivot.yaml

  curl -X POST 'http://localhost:8080/api/v1/pivot?sort_groups=true' \
    --data-binary @orders.xlsx -o orders_pivot.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SIZEPIVOT_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SIZEPIVOT_PORT")]
    port: u16,

    /// YAML configuration applied to every request
    #[arg(short, long, env = "SIZEPIVOT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let pivot_config = PivotConfig::load_or_default(args.config.as_deref())?;
    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config, pivot_config).await
}
