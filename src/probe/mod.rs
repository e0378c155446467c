//! Reachability probing.
//!
//! A probe issues exactly one ICMP echo exchange against a relay address and
//! reports round-trip latency in milliseconds, or the [`UNREACHABLE_MS`]
//! sentinel on any failure. The sentinel contract is hard: the orchestrator
//! runs many probes concurrently and a single failing target must never be
//! able to abort the batch, so nothing escapes the probe boundary as an
//! error or panic. Retry policy, if any, belongs to the caller.

mod icmp;

use std::time::Duration;

use async_trait::async_trait;

pub use icmp::IcmpProbe;

/// Sentinel latency for an unreachable or unknown target.
pub const UNREACHABLE_MS: i64 = -1;

/// Issues a single echo exchange against one address.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Probes `address` once, waiting at most `timeout` for the reply.
    ///
    /// Returns round-trip latency in milliseconds (`>= 0`) on success and
    /// [`UNREACHABLE_MS`] on timeout, transport failure, an unparseable
    /// address, or a non-success reply. Never returns an error.
    async fn probe(&self, address: &str, timeout: Duration) -> i64;
}
