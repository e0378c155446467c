//! Error types for evaluation rounds.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can end an evaluation round without a settled result.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The catalog could not be fetched or decoded; the round produced no
    /// candidates and the previous settled view is retained.
    #[error("catalog fetch failed: {0}")]
    Fetch(#[from] CatalogError),

    /// A newer refresh started while this round was in flight; this round's
    /// results were discarded.
    #[error("refresh superseded by a newer round")]
    Superseded,
}
