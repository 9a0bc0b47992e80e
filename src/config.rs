//! Pivot configuration
//!
//! Every list the transform depends on (key columns, canonical sizes, the
//! preferred column prefix, date columns) is data, loadable from YAML so a
//! deployment can change it without a rebuild.

use crate::error::{SizePivotError, SizePivotResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical size sequence; position defines tier-1 sort order
pub const DEFAULT_CANONICAL_SIZES: [&str; 17] = [
    "OS", "O/S", "One size", "UNI", "XXXS", "XXS", "XS", "XS/S", "S", "S/M", "M", "M/L", "L",
    "L/XL", "XL", "XXL", "XXXL",
];

pub const DEFAULT_KEY_COLUMNS: [&str; 4] = ["Season", "Color", "Style Number", "Name"];

pub const DEFAULT_PREFERRED_COLUMNS: [&str; 10] = [
    "Season",
    "Division",
    "Style Number",
    "Name",
    "Color",
    "Color Code",
    "Wholesale (EUR)",
    "Retail (EUR)",
    "Ship Start",
    "Ship End",
];

pub const DEFAULT_DATE_COLUMNS: [&str; 2] = ["Ship Start", "Ship End"];

pub const COLOR_CODE_COLUMN: &str = "Color Code";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Settings shared by the normalizer, the pivot engine and the xlsx codec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PivotConfig {
    pub key_columns: Vec<String>,
    /// Append `Color Code` to the key when the input has that column
    pub include_color_code: bool,
    pub size_column: String,
    pub qty_column: String,
    pub style_column: String,
    /// Decorative label stripped from the end of size values
    pub size_suffix: String,
    pub canonical_sizes: Vec<String>,
    pub preferred_columns: Vec<String>,
    pub date_columns: Vec<String>,
    /// Render zero quantities as empty cells
    pub zero_as_empty: bool,
    /// Drop size columns that are empty for every group
    pub drop_empty_sizes: bool,
    /// Sort output rows by key instead of first appearance
    pub sort_groups: bool,
    /// Report groups whose descriptive columns disagree between rows
    pub check_consistency: bool,
    pub sheet_name: String,
    pub date_format: String,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            key_columns: strings(&DEFAULT_KEY_COLUMNS),
            include_color_code: false,
            size_column: "Size".to_string(),
            qty_column: "Qty".to_string(),
            style_column: "Style Number".to_string(),
            size_suffix: "Sizes".to_string(),
            canonical_sizes: strings(&DEFAULT_CANONICAL_SIZES),
            preferred_columns: strings(&DEFAULT_PREFERRED_COLUMNS),
            date_columns: strings(&DEFAULT_DATE_COLUMNS),
            zero_as_empty: true,
            drop_empty_sizes: true,
            sort_groups: false,
            check_consistency: false,
            sheet_name: "Sheet1".to_string(),
            date_format: "dd/mm/yyyy".to_string(),
        }
    }
}

impl PivotConfig {
    /// Load and validate a YAML config file
    pub fn load(path: &Path) -> SizePivotResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> SizePivotResult<Self> {
        // An empty document means "all defaults"
        let config: PivotConfig = if content.trim().is_empty() {
            PivotConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> SizePivotResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load from an optional path, falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> SizePivotResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> SizePivotResult<()> {
        if self.key_columns.is_empty() {
            return Err(SizePivotError::Config(
                "key_columns must name at least one column".to_string(),
            ));
        }
        if self.key_columns.iter().any(|k| k.trim().is_empty()) {
            return Err(SizePivotError::Config(
                "key_columns must not contain blank names".to_string(),
            ));
        }
        if self.size_column.trim().is_empty() || self.qty_column.trim().is_empty() {
            return Err(SizePivotError::Config(
                "size_column and qty_column must not be blank".to_string(),
            ));
        }
        if self.size_column == self.qty_column {
            return Err(SizePivotError::Config(format!(
                "size_column and qty_column are both '{}'",
                self.size_column
            )));
        }
        if self.style_column == self.size_column {
            return Err(SizePivotError::Config(format!(
                "style_column and size_column are both '{}'",
                self.size_column
            )));
        }
        for special in [&self.size_column, &self.qty_column] {
            if self.key_columns.contains(special) {
                return Err(SizePivotError::Config(format!(
                    "'{}' cannot be both a key column and the size/qty column",
                    special
                )));
            }
        }
        if self.sheet_name.is_empty() || self.sheet_name.chars().count() > 31 {
            return Err(SizePivotError::Config(
                "sheet_name must be 1-31 characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Key columns for a concrete table, extended with `Color Code` when enabled
    pub fn effective_key_columns(&self, available: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.key_columns.len() + 1);
        for key in &self.key_columns {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        if self.include_color_code
            && available.contains(&COLOR_CODE_COLUMN)
            && !keys.iter().any(|k| k == COLOR_CODE_COLUMN)
        {
            keys.push(COLOR_CODE_COLUMN.to_string());
        }
        keys
    }
}
