//! Reusable test helpers for evaluation-round integration tests.
//!
//! These helpers drive the real orchestrator/enforcer stack over the
//! in-memory firewall backend (`test-utils` feature) with deterministic
//! catalog and probe doubles. No network or platform firewall is touched.

#![allow(dead_code)] // Each integration binary uses a subset of these.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use relaypicker_core::catalog::{CatalogResult, CatalogSource, RelayEndpoint, RelayGroup};
use relaypicker_core::probe::{ReachabilityProbe, UNREACHABLE_MS};

/// Builds a relay group with the catalog's bracket/comma port syntax.
pub fn group(name: &str, description: &str, addresses: &[&str]) -> RelayGroup {
    RelayGroup {
        name: name.to_string(),
        description: description.to_string(),
        endpoints: addresses
            .iter()
            .map(|address| RelayEndpoint {
                address: (*address).to_string(),
                port_range: "[27015,27068]".to_string(),
            })
            .collect(),
        requires_partner_credential: false,
    }
}

/// Catalog source that always yields the same groups.
pub struct StaticCatalog(pub Vec<RelayGroup>);

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch(&self) -> CatalogResult<Vec<RelayGroup>> {
        Ok(self.0.clone())
    }
}

/// Catalog source that yields each catalog in sequence, then repeats the
/// last one. Lets a test hand different topologies to successive rounds.
pub struct SequenceCatalog {
    catalogs: Vec<Vec<RelayGroup>>,
    next: AtomicUsize,
}

impl SequenceCatalog {
    pub fn new(catalogs: Vec<Vec<RelayGroup>>) -> Self {
        Self {
            catalogs,
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogSource for SequenceCatalog {
    async fn fetch(&self) -> CatalogResult<Vec<RelayGroup>> {
        let index = self
            .next
            .fetch_add(1, Ordering::SeqCst)
            .min(self.catalogs.len() - 1);
        Ok(self.catalogs[index].clone())
    }
}

/// Probe with a fixed latency and a configurable artificial delay.
///
/// The delay keeps a round's evaluation in flight long enough for a test
/// to start a competing refresh.
pub struct DelayedProbe {
    pub latency: i64,
    pub delay: Duration,
}

#[async_trait]
impl ReachabilityProbe for DelayedProbe {
    async fn probe(&self, _address: &str, _timeout: Duration) -> i64 {
        tokio::time::sleep(self.delay).await;
        self.latency
    }
}

/// Probe where a listed set of addresses never answers.
pub struct PartialProbe {
    pub latency: i64,
    pub dead: Vec<String>,
}

#[async_trait]
impl ReachabilityProbe for PartialProbe {
    async fn probe(&self, address: &str, _timeout: Duration) -> i64 {
        if self.dead.iter().any(|dead| dead == address) {
            UNREACHABLE_MS
        } else {
            self.latency
        }
    }
}
