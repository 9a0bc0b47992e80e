//! Excel exporter implementation - Table → .xlsx bytes

use crate::config::PivotConfig;
use crate::error::{SizePivotError, SizePivotResult};
use crate::types::{CellValue, Table};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::path::Path;

/// Excel worksheet maximum row count (header included)
pub const EXCEL_MAX_ROWS: usize = 1_048_576;
/// Excel worksheet maximum column count
pub const EXCEL_MAX_COLS: usize = 16_384;

/// Writes one table as a single worksheet: header row, then data rows
#[derive(Debug, Clone)]
pub struct ExcelExporter {
    sheet_name: String,
    date_format: String,
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new(&PivotConfig::default())
    }
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(config: &PivotConfig) -> Self {
        Self {
            sheet_name: config.sheet_name.clone(),
            date_format: config.date_format.clone(),
        }
    }

    /// Encode `table` as .xlsx bytes
    pub fn encode(&self, table: &Table) -> SizePivotResult<Vec<u8>> {
        let mut workbook = self.build_workbook(table)?;
        workbook
            .save_to_buffer()
            .map_err(|e| SizePivotError::Encode(format!("Failed to save workbook: {}", e)))
    }

    /// Export `table` to an .xlsx file
    pub fn export(&self, table: &Table, output_path: &Path) -> SizePivotResult<()> {
        let bytes = self.encode(table)?;
        std::fs::write(output_path, bytes)?;
        Ok(())
    }

    fn build_workbook(&self, table: &Table) -> SizePivotResult<Workbook> {
        if table.row_count() + 1 > EXCEL_MAX_ROWS {
            return Err(SizePivotError::Encode(format!(
                "{} rows exceed the Excel limit of {}",
                table.row_count(),
                EXCEL_MAX_ROWS - 1
            )));
        }
        if table.column_count() > EXCEL_MAX_COLS {
            return Err(SizePivotError::Encode(format!(
                "{} columns exceed the Excel limit of {}",
                table.column_count(),
                EXCEL_MAX_COLS
            )));
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| SizePivotError::Encode(format!("Failed to set worksheet name: {}", e)))?;

        self.write_table(worksheet, table)?;
        Ok(workbook)
    }

    fn write_table(&self, worksheet: &mut Worksheet, table: &Table) -> SizePivotResult<()> {
        let date_format = Format::new().set_num_format(&self.date_format);

        for (col_idx, column) in table.columns.iter().enumerate() {
            let col = col_idx as u16;
            worksheet
                .write_string(0, col, &column.name)
                .map_err(|e| SizePivotError::Encode(format!("Failed to write header: {}", e)))?;

            for (row_idx, cell) in column.values.iter().enumerate() {
                // Row 0 is the header
                let row = (row_idx + 1) as u32;
                Self::write_cell(worksheet, row, col, cell, &date_format)?;
            }
        }

        Ok(())
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &CellValue,
        date_format: &Format,
    ) -> SizePivotResult<()> {
        let result = match cell {
            CellValue::Empty => return Ok(()),
            CellValue::Text(s) => worksheet.write_string(row, col, s).map(|_| ()),
            CellValue::Number(n) if n.is_finite() => worksheet.write_number(row, col, *n).map(|_| ()),
            CellValue::Number(n) => worksheet.write_string(row, col, n.to_string()).map(|_| ()),
            CellValue::Date(d) => match Self::excel_date(d) {
                Some(date) => worksheet
                    .write_datetime_with_format(row, col, &date, date_format)
                    .map(|_| ()),
                // Outside Excel's 1900..=9999 calendar
                None => worksheet
                    .write_string(row, col, d.format("%Y-%m-%d").to_string())
                    .map(|_| ()),
            },
        };
        result.map_err(|e| {
            SizePivotError::Encode(format!("Failed to write cell ({}, {}): {}", row, col, e))
        })
    }

    fn excel_date(date: &chrono::NaiveDate) -> Option<ExcelDateTime> {
        let year = u16::try_from(date.year())
            .ok()
            .filter(|y| (1900..=9999).contains(y))?;
        ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
    }
}
