use clap::{Parser, Subcommand};
use sizepivot::cli::{self, PivotOptions};
use sizepivot::error::SizePivotResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sizepivot")]
#[command(about = "Pivot order spreadsheets into one quantity column per size.")]
#[command(long_about = "sizepivot - size-run pivot for order spreadsheets

Turns line items (one row per style × colour × size) into a report with one
row per style variant and one quantity column per size.

COMMANDS:
  pivot    - Clean, pivot and export to .xlsx
  clean    - Only clean size labels and style numbers
  sizes    - List distinct sizes in output column order
  preview  - Show the first rows of a spreadsheet
  init     - Write the default configuration file

SIZE COLUMN ORDER:
  1. Canonical sizes: OS, O/S, One size, UNI, XXXS ... XL, XXL, XXXL
  2. Other labels, alphabetically (case-sensitive)
  3. Numeric sizes by value: 4, 36, 38, 40

EXAMPLES:
  sizepivot pivot orders.xlsx                     # → orders_pivot.xlsx
  sizepivot pivot orders.xlsx -o report.xlsx --preview 10
  sizepivot pivot orders.xlsx --config sizepivot.yaml
  sizepivot clean orders.xlsx --size-column Sizes

Set RUST_LOG=sizepivot=debug for diagnostic logging.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Clean, pivot and export an order spreadsheet.

Rows are grouped by the key columns (default: Season, Color, Style Number,
Name). Quantities are summed per size; every group gets every size column.
Descriptive columns (prices, ship dates, ...) come from the first row of each
group. Zero quantities are left blank and sizes nobody ordered are dropped
unless --keep-zeros / --keep-empty-sizes are given.

EXAMPLES:
  sizepivot pivot orders.xlsx
  sizepivot pivot orders.xlsx --keys \"Season,Style Number\" --color-code
  sizepivot pivot orders.xlsx --dry-run --preview 20")]
    /// Clean, pivot and export to .xlsx
    Pivot {
        /// Input spreadsheet (.xlsx, .xls, .ods)
        input: PathBuf,

        /// Output .xlsx path (default: <input>_pivot.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML configuration file
        #[arg(short, long, env = "SIZEPIVOT_CONFIG")]
        config: Option<PathBuf>,

        /// Comma-separated grouping key columns
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Name of the size column
        #[arg(long)]
        size_column: Option<String>,

        /// Name of the quantity column
        #[arg(long)]
        qty_column: Option<String>,

        /// Add "Color Code" to the grouping key when present
        #[arg(long)]
        color_code: bool,

        /// Write zero quantities instead of blank cells
        #[arg(long)]
        keep_zeros: bool,

        /// Keep size columns that nobody ordered
        #[arg(long)]
        keep_empty_sizes: bool,

        /// Sort rows by key instead of first appearance
        #[arg(long)]
        sort_groups: bool,

        /// Report groups whose descriptive columns disagree
        #[arg(long)]
        check_consistency: bool,

        /// Print the first N output rows
        #[arg(short, long)]
        preview: Option<usize>,

        /// Run without writing the output file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show verbose steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Clean size labels and style numbers without pivoting
    Clean {
        /// Input spreadsheet
        input: PathBuf,

        /// Output .xlsx path (default: <input>_clean.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML configuration file
        #[arg(short, long, env = "SIZEPIVOT_CONFIG")]
        config: Option<PathBuf>,

        /// Name of the size column
        #[arg(long)]
        size_column: Option<String>,

        /// Show verbose steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// List distinct sizes in output column order
    Sizes {
        /// Input spreadsheet
        input: PathBuf,

        /// YAML configuration file
        #[arg(short, long, env = "SIZEPIVOT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show the first rows of a spreadsheet
    Preview {
        /// Input spreadsheet
        input: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value = "10")]
        rows: usize,
    },

    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(default_value = "sizepivot.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> SizePivotResult<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Pivot {
            input,
            output,
            config,
            keys,
            size_column,
            qty_column,
            color_code,
            keep_zeros,
            keep_empty_sizes,
            sort_groups,
            check_consistency,
            preview,
            dry_run,
            verbose,
        } => cli::pivot(
            input,
            PivotOptions {
                output,
                config,
                keys,
                size_column,
                qty_column,
                color_code,
                keep_zeros,
                keep_empty_sizes,
                sort_groups,
                check_consistency,
                preview,
                dry_run,
                verbose,
            },
        ),

        Commands::Clean {
            input,
            output,
            config,
            size_column,
            verbose,
        } => cli::clean(input, output, config, size_column, verbose),

        Commands::Sizes { input, config } => cli::sizes(input, config),

        Commands::Preview { input, rows } => cli::preview(input, rows),

        Commands::Init { output, force } => cli::init(output, force),
    }
}
