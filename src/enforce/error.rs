//! Error types for route enforcement.

use thiserror::Error;

use crate::firewall::FirewallError;

/// Errors that can occur while enabling or disabling a route block.
///
/// A failed operation leaves the route's cached blocked flag unchanged;
/// only a confirmed backend mutation updates application state.
#[derive(Debug, Error)]
pub enum EnforcementError {
    /// No candidate with this display name exists in the settled view.
    #[error("no route named `{0}` in the settled view")]
    UnknownRoute(String),

    /// The firewall backend failed for one route.
    #[error("enforcement failed for `{display_name}`: {source}")]
    Backend {
        /// Display name of the route whose operation failed.
        display_name: String,
        /// The underlying backend failure.
        source: FirewallError,
    },

    /// A prefix-wide clear could not complete.
    #[error("failed to clear rules under `{prefix}`: {source}")]
    Clear {
        /// The reserved rule-name prefix being cleared.
        prefix: String,
        /// The underlying backend failure.
        source: FirewallError,
    },
}

/// Result type for enforcement operations.
pub type EnforcementResult<T> = Result<T, EnforcementError>;
