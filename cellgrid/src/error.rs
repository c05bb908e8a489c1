//! Error types for grid index construction.
//!
//! The indexes in this crate treat expected absences (a lookup or removal
//! that matches nothing) as `Option::None`, never as errors. The only
//! fallible operation is construction, which validates the cell size.

use thiserror::Error;

/// Errors that can occur when building a grid index.
#[derive(Debug, Error)]
pub enum GridError {
    /// The cell size passed to a constructor was zero, negative, NaN or
    /// infinite.
    #[error("invalid cell size {0}: must be finite and positive")]
    InvalidCellSize(f64),
}

/// Result type for grid index operations.
pub type GridResult<T> = Result<T, GridError>;
