//! Route enforcement over a firewall backend.
//!
//! [`RouteEnforcer`] maps application-level route display names to backend
//! rule names under a reserved prefix and exposes idempotent enable/disable
//! operations. It holds one long-lived backend reference injected at
//! construction; "is this route blocked" queries are always reconciled
//! against backend state rather than a shadow copy.

mod enforcer;
mod error;

pub use enforcer::{RouteEnforcer, DEFAULT_RULE_PREFIX};
pub use error::{EnforcementError, EnforcementResult};
