//! Error types and result handling.
use thiserror::Error;

/// Result type alias for gr operations.
pub type Result<T> = std::result::Result<T, GrError>;

/// Errors a job can surface. Diagnostics print the bare underlying error,
/// so the wrapping never leaks into the stderr surface.
#[derive(Debug, Error)]
pub enum GrError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Regex(#[from] regex::Error),
}
