//! Cell cleaning applied before grouping
//!
//! Strips the decorative `Sizes` label from size values and trailing `-`
//! from style numbers. Total: malformed or non-text cells pass through, and
//! absent columns are skipped.

use crate::config::PivotConfig;
use crate::types::{CellValue, Table};
use tracing::debug;

/// Trim and strip trailing `suffix` labels until none remain
pub fn clean_size(value: &str, suffix: &str) -> String {
    let mut cleaned = value.trim();
    if !suffix.is_empty() {
        while let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.trim();
        }
    }
    cleaned.to_string()
}

/// Strip every trailing `-`
pub fn clean_style_number(value: &str) -> String {
    value.trim_end_matches('-').to_string()
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    size_column: String,
    style_column: String,
    size_suffix: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&PivotConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &PivotConfig) -> Self {
        Self {
            size_column: config.size_column.clone(),
            style_column: config.style_column.clone(),
            size_suffix: config.size_suffix.clone(),
        }
    }

    /// Return a cleaned copy of `table`; row count and order are unchanged
    pub fn normalize(&self, table: &Table) -> Table {
        let mut out = table.clone();

        if let Some(column) = out.column_mut(&self.size_column) {
            let mut changed = 0usize;
            for cell in column.values.iter_mut() {
                if let CellValue::Text(s) = cell {
                    let cleaned = clean_size(s, &self.size_suffix);
                    if cleaned != *s {
                        *s = cleaned;
                        changed += 1;
                    }
                }
            }
            debug!(column = %self.size_column, changed, "cleaned size labels");
        }

        if let Some(column) = out.column_mut(&self.style_column) {
            for cell in column.values.iter_mut() {
                if let CellValue::Text(s) = cell {
                    if s.ends_with('-') {
                        *s = clean_style_number(s);
                    }
                }
            }
        }

        out
    }
}

/// Normalize with the default column names
pub fn normalize(table: &Table) -> Table {
    Normalizer::default().normalize(table)
}
