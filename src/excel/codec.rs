//! Byte-level table codec used by the CLI and the API shell

use super::{ExcelExporter, ExcelImporter};
use crate::config::PivotConfig;
use crate::error::SizePivotResult;
use crate::types::Table;
use std::path::Path;

/// Converts between spreadsheet bytes and an in-memory [`Table`]
pub trait TableCodec {
    /// Fails with `Decode` on malformed input
    fn decode(&self, bytes: &[u8]) -> SizePivotResult<Table>;

    fn encode(&self, table: &Table) -> SizePivotResult<Vec<u8>>;
}

/// .xlsx codec: calamine in, rust_xlsxwriter out
#[derive(Debug, Clone, Default)]
pub struct XlsxCodec {
    importer: ExcelImporter,
    exporter: ExcelExporter,
}

impl XlsxCodec {
    pub fn new(config: &PivotConfig) -> Self {
        Self {
            importer: ExcelImporter::new(),
            exporter: ExcelExporter::new(config),
        }
    }

    pub fn with_importer(mut self, importer: ExcelImporter) -> Self {
        self.importer = importer;
        self
    }

    pub fn read_table(&self, path: &Path) -> SizePivotResult<Table> {
        self.importer.import(path)
    }

    pub fn write_table(&self, table: &Table, path: &Path) -> SizePivotResult<()> {
        self.exporter.export(table, path)
    }
}

impl TableCodec for XlsxCodec {
    fn decode(&self, bytes: &[u8]) -> SizePivotResult<Table> {
        self.importer.decode(bytes)
    }

    fn encode(&self, table: &Table) -> SizePivotResult<Vec<u8>> {
        self.exporter.encode(table)
    }
}
