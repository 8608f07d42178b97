//! Error types for CTM

use thiserror::Error;

/// Core CTM errors
///
/// Rejected reports are not errors; they are carried as
/// [`Verdict::Rejected`](crate::Verdict). These variants cover malformed
/// input shapes only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrustError {
    #[error("Invalid note value: {0} (must be -1, 0 or 1)")]
    InvalidNote(i64),

    #[error("Column {column} out of bounds for row of width {width}")]
    ColumnOutOfBounds { column: usize, width: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Result type for CTM operations
pub type TrustResult<T> = Result<T, TrustError>;
