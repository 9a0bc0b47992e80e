//! Date coercion for ship-window columns

use crate::types::CellValue;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Day-first formats are tried before month-first ones
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%m/%d/%Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Largest serial Excel accepts (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Convert an Excel 1900-system serial to a date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    // 1899-12-30 absorbs the phantom 1900-02-29
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Coerce a cell to a date.
///
/// Empty cells (and blank text) stay empty. `None` means the cell holds a
/// value that is not a date.
pub fn coerce_date(cell: &CellValue) -> Option<CellValue> {
    match cell {
        CellValue::Date(_) | CellValue::Empty => Some(cell.clone()),
        CellValue::Text(s) if s.trim().is_empty() => Some(CellValue::Empty),
        CellValue::Text(s) => parse_date_text(s).map(CellValue::Date),
        CellValue::Number(n) => excel_serial_to_date(*n).map(CellValue::Date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(excel_serial_to_date(45292.0), Some(ymd(2024, 1, 1)));
        assert_eq!(excel_serial_to_date(45292.75), Some(ymd(2024, 1, 1)));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(3_000_000.0), None);
    }

    #[test]
    fn test_parse_text_formats() {
        assert_eq!(parse_date_text("2024-03-15"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date_text("15/03/2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date_text("15.03.2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date_text("2024-03-15 08:30:00"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date_text("2024-03-15T08:30:00"), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_day_first_wins_when_ambiguous() {
        assert_eq!(parse_date_text("02/03/2024"), Some(ymd(2024, 3, 2)));
        // Only valid month-first
        assert_eq!(parse_date_text("03/25/2024"), Some(ymd(2024, 3, 25)));
    }

    #[test]
    fn test_coerce_date() {
        assert_eq!(coerce_date(&CellValue::Empty), Some(CellValue::Empty));
        assert_eq!(coerce_date(&CellValue::text("  ")), Some(CellValue::Empty));
        assert_eq!(
            coerce_date(&CellValue::text("2024-01-01")),
            Some(CellValue::Date(ymd(2024, 1, 1)))
        );
        assert_eq!(
            coerce_date(&CellValue::Number(45292.0)),
            Some(CellValue::Date(ymd(2024, 1, 1)))
        );
        assert_eq!(coerce_date(&CellValue::text("next week")), None);
        assert_eq!(coerce_date(&CellValue::Number(-4.0)), None);
    }
}
