//! ICMP echo probe implementation.

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use rand::random;
use surge_ping::{Client, Config, PingIdentifier, PingSequence};
use tokio::sync::OnceCell;
use tracing::debug;

use super::{ReachabilityProbe, UNREACHABLE_MS};

/// Payload sent with each echo request.
const ECHO_PAYLOAD: &[u8] = &[0u8; 32];

/// Probes relay addresses with a single ICMP echo per call.
///
/// The underlying ICMP client is created lazily on first use and shared
/// across probes; creating it can fail on hosts without ICMP socket
/// permissions, in which case every probe reports [`UNREACHABLE_MS`]
/// rather than erroring.
#[derive(Default)]
pub struct IcmpProbe {
    client: OnceCell<Client>,
}

// The ICMP client itself carries no Debug implementation; report only
// whether it has been initialized.
impl fmt::Debug for IcmpProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcmpProbe")
            .field("client_initialized", &self.client.initialized())
            .finish()
    }
}

impl IcmpProbe {
    /// Creates a probe with a not-yet-initialized ICMP client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Option<&Client> {
        self.client
            .get_or_try_init(|| async { Client::new(&Config::default()) })
            .await
            .map_err(|e| {
                debug!(error = %e, "ICMP client unavailable");
                e
            })
            .ok()
    }
}

#[async_trait]
impl ReachabilityProbe for IcmpProbe {
    async fn probe(&self, address: &str, timeout: Duration) -> i64 {
        let ip: IpAddr = match address.parse() {
            Ok(ip) => ip,
            Err(_) => {
                debug!(address, "probe target is not a valid IP address");
                return UNREACHABLE_MS;
            }
        };

        let Some(client) = self.client().await else {
            return UNREACHABLE_MS;
        };

        let mut pinger = client.pinger(ip, PingIdentifier(random())).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), ECHO_PAYLOAD).await {
            Ok((_, round_trip)) => i64::try_from(round_trip.as_millis()).unwrap_or(i64::MAX),
            Err(e) => {
                debug!(address, error = %e, "echo exchange failed");
                UNREACHABLE_MS
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_address_is_unreachable() {
        let probe = IcmpProbe::new();
        let latency = probe
            .probe("not-an-ip-address", Duration::from_millis(50))
            .await;

        assert_eq!(latency, UNREACHABLE_MS);
    }

    #[test]
    fn debug_reports_client_state_only() {
        let probe = IcmpProbe::new();
        let debug_str = format!("{probe:?}");
        assert!(debug_str.contains("IcmpProbe"));
        assert!(debug_str.contains("client_initialized: false"));
    }

    #[tokio::test]
    async fn hostname_is_not_resolved() {
        // The probe takes literal addresses only; resolution is upstream's job.
        let probe = IcmpProbe::new();
        let latency = probe
            .probe("relay.example.com", Duration::from_millis(50))
            .await;

        assert_eq!(latency, UNREACHABLE_MS);
    }
}
