//! Error types for similarity providers.

use thiserror::Error;

/// Failure reported by a similarity provider.
///
/// The matching engine never lets these escape: a failing provider only
/// removes its layer from consideration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimilarityError {
    #[error("similarity provider '{0}' is disabled")]
    Disabled(String),

    #[error("similarity provider '{provider}' failed: {message}")]
    Failed { provider: String, message: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
