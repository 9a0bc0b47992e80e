//! Excel import/export
//!
//! - Import: .xlsx/.xls/.ods bytes → Table (first worksheet, header row 1)
//! - Export: Table → single-sheet .xlsx bytes

mod codec;
mod exporter;
mod importer;

pub use codec::{TableCodec, XlsxCodec};
pub use exporter::{ExcelExporter, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};
pub use importer::ExcelImporter;
