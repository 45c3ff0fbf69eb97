//! Error types for dataset access and pipeline stages.

use thiserror::Error;

/// Errors raised while reading or transforming a dataset table.
///
/// Absent cells are never errors; they travel through the pipeline as nulls.
#[derive(Debug, Error)]
pub enum DataError {
    /// A column the operation depends on is not part of the table.
    #[error("{context}: required column '{column}' not found")]
    MissingField { column: String, context: String },

    /// A numeric operation was asked to work on a text column.
    #[error("{context}: column '{column}' is not numeric")]
    NonNumericField { column: String, context: String },

    /// A field name that is not part of the schema.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A typed row view needs a value the row does not carry.
    #[error("row {row}: '{column}' is absent")]
    AbsentValue { row: usize, column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl DataError {
    pub fn missing_field(column: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            column: column.into(),
            context: context.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for DataError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = DataError::missing_field("total_cases", "forward_fill");
        assert_eq!(
            err.to_string(),
            "forward_fill: required column 'total_cases' not found"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("date".into());
        let err: DataError = polars_err.into();
        assert!(matches!(err, DataError::DataFrame { .. }));
    }
}
