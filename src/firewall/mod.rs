//! Firewall backend capability.
//!
//! The core never talks to a platform firewall directly; it consumes the
//! [`FirewallBackend`] trait, which enumerates, creates, and deletes named
//! outbound block rules. Name-prefix scoping is the safety boundary: the
//! core only ever reads or removes rules under its reserved prefix and must
//! never touch unrelated rules.
//!
//! Two implementations ship here:
//!
//! - [`NetshFirewall`] drives the Windows Advanced Firewall through the
//!   `netsh advfirewall firewall` command set;
//! - [`NullFirewall`] is the unsupported-platform representation: listing is
//!   always empty and mutations are well-defined no-ops. The core never
//!   branches on platform identity itself; [`platform_default`] picks one
//!   implementation once at process start.
//!
//! Every rule created through this capability blocks outbound UDP traffic
//! to one remote address and port range.

mod backend;
mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod netsh;
mod types;

use std::sync::Arc;

pub use backend::{FirewallBackend, NullFirewall};
pub use error::{FirewallError, FirewallResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryFirewall;
pub use netsh::NetshFirewall;
pub use types::{normalize_port_range, BlockRule};

/// Selects the firewall backend for the current platform.
///
/// This is the single platform-dispatch point: Windows gets the production
/// `netsh` backend, everything else gets the null backend whose operations
/// are documented no-ops.
#[must_use]
pub fn platform_default() -> Arc<dyn FirewallBackend> {
    if cfg!(windows) {
        Arc::new(NetshFirewall::new())
    } else {
        Arc::new(NullFirewall)
    }
}
