//! Error types for loading, reporting and PDF export

use thiserror::Error;

/// Hard failures: the input could not be read at all, or output could not be produced
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file type: {0} (expected a .csv file)")]
    UnsupportedFileType(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("No report table found in PDF")]
    MissingTable,

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Soft issues found while ingesting a submissions file
///
/// These never abort parsing. `MissingColumns` blocks the file (no rows are kept);
/// `MalformedRow` only drops the offending row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestIssue {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },
}

impl IngestIssue {
    /// Whether this issue prevents any report from being produced
    pub fn is_blocking(&self) -> bool {
        matches!(self, IngestIssue::MissingColumns(_))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
