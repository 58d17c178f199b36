use thiserror::Error;

/// Domain error taxonomy for the import/export/projection pipeline.
/// Messages are what the admin UI shows operators, so validation errors
/// carry the 1-based source line and enough detail to fix the file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Trade name must be lowercase letters only, no spaces")]
    InvalidTradeName,
    #[error("CSV file not found")]
    FileNotFound,
    #[error("Could not open CSV file: {0}")]
    FileOpen(String),
    #[error("{0}")]
    InvalidFileType(String),
    #[error("Maximum file size is {max_mb}MB")]
    FileTooLarge { max_mb: u64 },
    #[error("Invalid CSV format. Expected headers: {expected}")]
    HeaderMismatch { expected: String },
    #[error("Line {line}: Expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: Invalid state code \"{value}\"")]
    InvalidStateCode { line: usize, value: String },
    #[error("Line {line}: Column {column} must be numeric")]
    NonNumericField { line: usize, column: usize },
    #[error("Line {line}: {message}")]
    Range { line: usize, message: &'static str },
    #[error("Line {line}: {message}")]
    MissingRequiredSlot { line: usize, message: &'static str },
    #[error("Upload limit reached: at most {max} uploads per hour")]
    RateLimited { max: usize },
    #[error("No data available for this trade")]
    NoData,
    #[error("Storage error: {0}")]
    StoreUnavailable(String),
}

impl DataError {
    /// Stable wire code for the IPC error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            DataError::InvalidTradeName => "invalid_trade_name",
            DataError::FileNotFound => "file_not_found",
            DataError::FileOpen(_) => "file_open_error",
            DataError::InvalidFileType(_) => "invalid_file",
            DataError::FileTooLarge { .. } => "file_too_large",
            DataError::HeaderMismatch { .. } => "header_mismatch",
            DataError::ColumnCount { .. } => "invalid_columns",
            DataError::InvalidStateCode { .. } => "invalid_state",
            DataError::NonNumericField { .. } => "invalid_number",
            DataError::Range { .. } => "invalid_range",
            DataError::MissingRequiredSlot { .. } => "missing_required_slot",
            DataError::RateLimited { .. } => "rate_limited",
            DataError::NoData => "no_data",
            DataError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StoreUnavailable(value.to_string())
    }
}
