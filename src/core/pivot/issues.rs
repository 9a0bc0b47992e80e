use crate::types::CellValue;
use serde::Serialize;
use std::fmt;

/// Non-fatal problem found while pivoting; the affected cell degrades to empty/zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DateCoercion,
    QuantityCoercion,
    /// A non-zero quantity on a row without a size label
    MissingSize,
    /// A descriptive column differs between rows of the same group
    DescriptiveConflict,
}

impl IssueKind {
    pub fn describe(&self) -> &'static str {
        match self {
            IssueKind::DateCoercion => "not a date",
            IssueKind::QuantityCoercion => "not a quantity",
            IssueKind::MissingSize => "quantity without a size",
            IssueKind::DescriptiveConflict => "differs from the first row of its group",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataIssue {
    /// Zero-based data row of the input table
    pub row: usize,
    pub column: String,
    pub kind: IssueKind,
    pub value: String,
}

impl DataIssue {
    pub fn new(row: usize, column: &str, kind: IssueKind, value: &CellValue) -> Self {
        Self {
            row,
            column: column.to_string(),
            kind,
            value: value.to_display_string(),
        }
    }

    /// 1-based spreadsheet row, counting the header
    pub fn sheet_row(&self) -> usize {
        self.row + 2
    }
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, column '{}': '{}' {}",
            self.sheet_row(),
            self.column,
            self.value,
            self.kind.describe()
        )
    }
}
