//! decode → normalize → pivot → encode
//!
//! Shared by the CLI and the HTTP API. Fatal errors stop the run before any
//! bytes are produced.

use crate::config::PivotConfig;
use crate::core::{DataIssue, Normalizer, PivotEngine, PivotOutput, PivotStats};
use crate::error::{SizePivotError, SizePivotResult};
use crate::excel::{TableCodec, XlsxCodec};
use crate::types::Table;
use tracing::info;

/// Encoded result plus what the shell needs for previews and reporting
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub bytes: Vec<u8>,
    pub table: Table,
    pub issues: Vec<DataIssue>,
    /// `None` for clean-only runs
    pub stats: Option<PivotStats>,
}

pub struct Pipeline<C: TableCodec = XlsxCodec> {
    codec: C,
    normalizer: Normalizer,
    engine: PivotEngine,
}

impl Pipeline<XlsxCodec> {
    pub fn new(config: PivotConfig) -> Self {
        let codec = XlsxCodec::new(&config);
        Self::with_codec(config, codec)
    }
}

impl<C: TableCodec> Pipeline<C> {
    pub fn with_codec(config: PivotConfig, codec: C) -> Self {
        Self {
            codec,
            normalizer: Normalizer::new(&config),
            engine: PivotEngine::new(config),
        }
    }

    pub fn config(&self) -> &PivotConfig {
        self.engine.config()
    }

    /// Decode and reject tables without data rows
    pub fn decode(&self, bytes: &[u8]) -> SizePivotResult<Table> {
        let table = self.codec.decode(bytes)?;
        if table.column_count() == 0 || table.is_empty() {
            return Err(SizePivotError::EmptyTable);
        }
        Ok(table)
    }

    /// Normalize then pivot an already decoded table
    pub fn transform(&self, table: &Table) -> SizePivotResult<PivotOutput> {
        let normalized = self.normalizer.normalize(table);
        self.engine.pivot(&normalized)
    }

    pub fn run(&self, bytes: &[u8]) -> SizePivotResult<PipelineOutput> {
        let input = self.decode(bytes)?;
        let output = self.transform(&input)?;
        let encoded = self.codec.encode(&output.table)?;

        info!(
            input_rows = output.stats.input_rows,
            output_rows = output.table.row_count(),
            sizes = output.stats.size_columns,
            issues = output.issues.len(),
            "pivot pipeline complete"
        );

        Ok(PipelineOutput {
            bytes: encoded,
            table: output.table,
            issues: output.issues,
            stats: Some(output.stats),
        })
    }

    /// Normalize only: the cleaned table keeps its line-item shape
    pub fn clean(&self, bytes: &[u8]) -> SizePivotResult<PipelineOutput> {
        let input = self.decode(bytes)?;
        let cleaned = self.normalizer.normalize(&input);
        let encoded = self.codec.encode(&cleaned)?;
        Ok(PipelineOutput {
            bytes: encoded,
            table: cleaned,
            issues: Vec::new(),
            stats: None,
        })
    }
}
