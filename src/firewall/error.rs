//! Error types for firewall backends.

use thiserror::Error;

/// Errors that can occur while talking to a firewall backend.
#[derive(Debug, Error)]
pub enum FirewallError {
    /// The backend rejected or failed an operation.
    #[error("firewall backend failure: {0}")]
    Backend(String),
}

/// Result type for firewall operations.
pub type FirewallResult<T> = Result<T, FirewallError>;
