//! Error types for catalog retrieval.

use thiserror::Error;

/// Errors that can occur while fetching or decoding the relay catalog.
///
/// A failed fetch produces no groups; callers keep whatever settled view
/// they already hold.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connection, TLS, non-success status).
    #[error("catalog request failed: {0}")]
    Network(String),

    /// The payload was retrieved but could not be decoded.
    #[error("catalog payload malformed: {0}")]
    Decode(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
