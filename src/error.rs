use thiserror::Error;

pub type SizePivotResult<T> = Result<T, SizePivotError>;

#[derive(Error, Debug)]
pub enum SizePivotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Could not read spreadsheet: {0}")]
    Decode(String),

    #[error("Could not write spreadsheet: {0}")]
    Encode(String),

    #[error("Malformed table: {0}")]
    InvalidTable(String),

    #[error("Missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("The uploaded table is empty. Please provide a file with data rows.")]
    EmptyTable,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SizePivotError {
    /// True for errors caused by the uploaded data rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SizePivotError::Decode(_)
                | SizePivotError::InvalidTable(_)
                | SizePivotError::Schema { .. }
                | SizePivotError::EmptyTable
        )
    }
}
