use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

//==============================================================================
// Cell Values
//==============================================================================

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String form used for labels and previews (empty cells render as "")
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Total order across variants: empty < number < date < text
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

//==============================================================================
// Grouping Keys
//==============================================================================

/// Tuple of key-column values identifying one style variant.
///
/// Numbers compare by bit pattern (with -0.0 folded into 0.0) so the key can
/// live in a hash map; empty cells are a regular, distinct key component.
#[derive(Debug, Clone)]
pub struct GroupKey(pub Vec<CellValue>);

impl GroupKey {
    fn number_bits(n: f64) -> u64 {
        if n == 0.0 {
            0.0f64.to_bits()
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(&other.0).all(|(a, b)| match (a, b) {
                (CellValue::Number(x), CellValue::Number(y)) => {
                    Self::number_bits(*x) == Self::number_bits(*y)
                }
                _ => a == b,
            })
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for cell in &self.0 {
            std::mem::discriminant(cell).hash(state);
            match cell {
                CellValue::Text(s) => s.hash(state),
                CellValue::Number(n) => Self::number_bits(*n).hash(state),
                CellValue::Date(d) => d.hash(state),
                CellValue::Empty => {}
            }
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.sort_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

//==============================================================================
// Tables
//==============================================================================

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every cell is empty (vacuously true for zero rows)
    pub fn is_all_empty(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }
}

/// Ordered, uniquely named columns of equal length
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header row and row-major cells.
    ///
    /// Short rows are padded with empty cells; extra cells are ignored.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or(CellValue::Empty));
            }
        }

        Self { columns }
    }

    /// Add a column, replacing any existing column with the same name in place
    pub fn add_column(&mut self, column: Column) {
        match self.column_index(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of rows (length of first column, all should be same)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cell at (row, column name)
    pub fn cell(&self, row: usize, name: &str) -> Option<&CellValue> {
        self.column(name).and_then(|c| c.values.get(row))
    }

    /// Row-major copy of one row, in column order
    pub fn row(&self, row: usize) -> Vec<CellValue> {
        self.columns
            .iter()
            .map(|c| c.values.get(row).cloned().unwrap_or(CellValue::Empty))
            .collect()
    }

    /// Validate all columns have the same length and unique names
    pub fn validate(&self) -> Result<(), String> {
        let row_count = self.row_count();
        for (idx, column) in self.columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(format!(
                    "Column '{}' has {} rows, expected {} rows",
                    column.name,
                    column.len(),
                    row_count
                ));
            }
            if self.columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(format!("Duplicate column name '{}'", column.name));
            }
        }
        Ok(())
    }
}
