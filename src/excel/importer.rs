//! Excel importer implementation - spreadsheet bytes → Table

use crate::error::{SizePivotError, SizePivotResult};
use crate::types::{format_number, CellValue, Table};
use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Reads the first worksheet (or a named one) of an .xlsx/.xls/.ods workbook
#[derive(Debug, Clone, Default)]
pub struct ExcelImporter {
    sheet: Option<String>,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `sheet` instead of the first worksheet
    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }

    /// Import an Excel file from disk
    pub fn import(&self, path: &Path) -> SizePivotResult<Table> {
        let bytes = std::fs::read(path)?;
        self.decode(&bytes)
    }

    /// Decode workbook bytes into a Table; row 1 holds the column names
    pub fn decode(&self, bytes: &[u8]) -> SizePivotResult<Table> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| SizePivotError::Decode(format!("Failed to open workbook: {}", e)))?;

        let range = match &self.sheet {
            Some(name) => workbook
                .worksheet_range(name)
                .map_err(|e| SizePivotError::Decode(format!("Sheet '{}': {}", name, e)))?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| SizePivotError::Decode("Workbook has no worksheets".to_string()))?
                .map_err(|e| SizePivotError::Decode(format!("Failed to read sheet: {}", e)))?,
        };

        let table = Self::range_to_table(&range);
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "decoded worksheet"
        );
        Ok(table)
    }

    fn range_to_table(range: &Range<Data>) -> Table {
        if range.is_empty() {
            return Table::new();
        }

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header) => Self::header_names(header),
            None => return Table::new(),
        };

        let data: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(Self::convert_cell).collect::<Vec<_>>())
            // Fully blank lines are spacing, not line items
            .filter(|row| !row.iter().all(CellValue::is_empty))
            .collect();

        Table::from_rows(headers, data)
    }

    /// Header cells to unique column names (`Unnamed: i` for blanks, `.n` for repeats)
    fn header_names(header: &[Data]) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(header.len());
        let mut taken: HashSet<String> = HashSet::new();

        for (idx, cell) in header.iter().enumerate() {
            let base = match cell {
                Data::String(s) if !s.trim().is_empty() => s.clone(),
                Data::Float(f) => format_number(*f),
                Data::Int(i) => i.to_string(),
                Data::Empty | Data::String(_) | Data::Error(_) => format!("Unnamed: {}", idx),
                other => other.to_string(),
            };

            let mut name = base.clone();
            let mut n = 1;
            while taken.contains(&name) {
                name = format!("{}.{}", base, n);
                n += 1;
            }
            taken.insert(name.clone());
            names.push(name);
        }

        names
    }

    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Data::DateTime(_) | Data::DateTimeIso(_) => cell
                .as_date()
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(cell.to_string())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) | Data::Empty => CellValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_names_blank_and_duplicates() {
        let header = vec![
            Data::String("Size".to_string()),
            Data::Empty,
            Data::String("Size".to_string()),
            Data::String("Size".to_string()),
            Data::Int(38),
            Data::String("  ".to_string()),
        ];
        assert_eq!(
            ExcelImporter::header_names(&header),
            vec!["Size", "Unnamed: 1", "Size.1", "Size.2", "38", "Unnamed: 5"]
        );
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(ExcelImporter::convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            ExcelImporter::convert_cell(&Data::Float(2.5)),
            CellValue::Number(2.5)
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::String("M Sizes".to_string())),
            CellValue::text("M Sizes")
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::String(String::new())),
            CellValue::Empty
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::Bool(true)),
            CellValue::text("TRUE")
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::Error(CellErrorType::NA)),
            CellValue::Empty
        );
    }

    #[test]
    fn test_convert_iso_datetime() {
        let cell = Data::DateTimeIso("2024-03-15T00:00:00".to_string());
        assert_eq!(
            ExcelImporter::convert_cell(&cell),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result = ExcelImporter::new().decode(b"definitely not a workbook");
        assert!(matches!(result, Err(SizePivotError::Decode(_))));
    }
}
