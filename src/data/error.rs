use thiserror::Error;

/// Problems with the shape or content of a source table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: '{value}' in column '{column}' is not a number")]
    NotANumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: String },
}
