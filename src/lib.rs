//! sizepivot - size-run pivot for order spreadsheets
//!
//! Takes a line-item order sheet (one row per style variant × size) and
//! produces a wide report with one quantity column per size.
//!
//! # Features
//!
//! - Size label cleaning (`"M Sizes"` → `"M"`) and style-number cleanup
//! - Grouping by a configurable business key, quantities summed per size
//! - Three-tier size column order: canonical sizes, other labels, numeric sizes
//! - Preferred column prefix and ship-date coercion
//! - Excel import/export, CLI and HTTP API
//!
//! # Example
//!
//! ```no_run
//! use sizepivot::config::PivotConfig;
//! use sizepivot::pipeline::Pipeline;
//!
//! let bytes = std::fs::read("orders.xlsx")?;
//! let output = Pipeline::new(PivotConfig::default()).run(&bytes)?;
//!
//! println!("Rows: {}", output.table.row_count());
//! std::fs::write("orders_pivot.xlsx", &output.bytes)?;
//! # Ok::<(), sizepivot::error::SizePivotError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::PivotConfig;
pub use error::{SizePivotError, SizePivotResult};
pub use types::{CellValue, Column, Table};
