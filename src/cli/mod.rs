//! CLI command handlers

pub mod commands;

pub use commands::{clean, init, pivot, preview, sizes, PivotOptions};
