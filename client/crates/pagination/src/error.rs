//! Error types for pagination primitives.

use thiserror::Error;

/// Errors raised while decoding pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The `meta` object was missing required fields or had the wrong types.
    #[error("invalid pagination metadata: {message}")]
    InvalidMeta {
        /// Description of the decode failure.
        message: String,
    },
}
