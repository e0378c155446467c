//! The evaluation-round coordinator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::error::RefreshError;
use super::types::{expand_groups, Candidate, RoundPhase};
use crate::catalog::CatalogSource;
use crate::enforce::{EnforcementError, RouteEnforcer};
use crate::probe::ReachabilityProbe;

/// Default per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fallback worker count when CPU parallelism cannot be determined.
const FALLBACK_PARALLELISM: usize = 4;

/// Coordinates catalog fetching, candidate evaluation, and enforcement.
///
/// One orchestrator owns the settled candidate view. Evaluation fans out
/// per-candidate work (one probe plus one blocked-state lookup) bounded by
/// available CPU parallelism; each task mutates only its own candidate, and
/// results are merged and sorted after the whole batch completes, under a
/// single short-held write lock. The probe and backend calls never run
/// inside that critical section.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use relaypicker_core::catalog::HttpCatalogFetcher;
/// use relaypicker_core::enforce::RouteEnforcer;
/// use relaypicker_core::firewall;
/// use relaypicker_core::probe::IcmpProbe;
/// use relaypicker_core::routes::RouteOrchestrator;
///
/// let orchestrator = RouteOrchestrator::new(
///     Arc::new(HttpCatalogFetcher::default()),
///     Arc::new(IcmpProbe::new()),
///     RouteEnforcer::new(firewall::platform_default()),
/// );
/// let candidates = orchestrator.refresh().await?;
/// ```
pub struct RouteOrchestrator {
    source: Arc<dyn CatalogSource>,
    probe: Arc<dyn ReachabilityProbe>,
    enforcer: Arc<RouteEnforcer>,

    /// The settled view: full, sorted candidate set of the latest round.
    candidates: RwLock<Vec<Candidate>>,
    phase: RwLock<RoundPhase>,

    /// Monotonic round counter; a round whose number no longer matches the
    /// counter has been superseded and must discard its results.
    generation: AtomicU64,

    probe_timeout: Duration,
    parallelism: usize,
}

impl RouteOrchestrator {
    /// Creates an orchestrator over the given catalog source, probe, and
    /// enforcer.
    #[must_use]
    pub fn new(
        source: Arc<dyn CatalogSource>,
        probe: Arc<dyn ReachabilityProbe>,
        enforcer: RouteEnforcer,
    ) -> Self {
        Self {
            source,
            probe,
            enforcer: Arc::new(enforcer),
            candidates: RwLock::new(Vec::new()),
            phase: RwLock::new(RoundPhase::Idle),
            generation: AtomicU64::new(0),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            parallelism: std::thread::available_parallelism()
                .map_or(FALLBACK_PARALLELISM, std::num::NonZeroUsize::get),
        }
    }

    /// Sets the per-probe timeout.
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Sets the evaluation worker bound (minimum 1).
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Returns the phase of the current round.
    pub async fn phase(&self) -> RoundPhase {
        *self.phase.read().await
    }

    /// Returns a snapshot of the settled candidate view.
    pub async fn candidates(&self) -> Vec<Candidate> {
        self.candidates.read().await.clone()
    }

    /// Runs one full evaluation round: fetch, expand, evaluate, settle.
    ///
    /// The settled result is the complete candidate set sorted by display
    /// name ascending. A fetch failure ends the round with no partial
    /// candidates; the previous settled view is retained. If a newer
    /// refresh starts while this one is in flight, this round's results
    /// are discarded and [`RefreshError::Superseded`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Fetch`] when the catalog cannot be fetched
    /// or decoded, and [`RefreshError::Superseded`] when a newer round won.
    pub async fn refresh(&self) -> Result<Vec<Candidate>, RefreshError> {
        let round = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.set_phase(round, RoundPhase::Fetching).await;
        let groups = match self.source.fetch().await {
            Ok(groups) => groups,
            Err(e) => {
                self.set_phase(round, RoundPhase::FetchFailed).await;
                return Err(RefreshError::Fetch(e));
            }
        };
        if self.superseded(round) {
            return Err(RefreshError::Superseded);
        }

        self.set_phase(round, RoundPhase::Expanding).await;
        let expanded = expand_groups(&groups);

        self.set_phase(round, RoundPhase::Evaluating).await;
        let mut evaluated = self.evaluate(expanded).await;
        evaluated.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        {
            let mut settled = self.candidates.write().await;
            if self.superseded(round) {
                debug!(round, "discarding superseded round");
                return Err(RefreshError::Superseded);
            }
            settled.clone_from(&evaluated);
        }

        self.set_phase(round, RoundPhase::Settled).await;
        info!(round, candidates = evaluated.len(), "round settled");
        Ok(evaluated)
    }

    /// Blocks or unblocks one route by display name.
    ///
    /// Routes to the enforcer's enable/disable; on backend success only,
    /// the cached blocked flag follows the confirmed state. No implicit
    /// re-evaluation is triggered — callers wanting independent
    /// confirmation re-query the enforcer themselves.
    ///
    /// # Errors
    ///
    /// Returns [`EnforcementError::UnknownRoute`] when no settled candidate
    /// has this display name, and [`EnforcementError::Backend`] when the
    /// firewall backend fails (the cached flag is left unchanged).
    pub async fn toggle(&self, display_name: &str, block: bool) -> Result<(), EnforcementError> {
        let target = {
            let settled = self.candidates.read().await;
            settled
                .iter()
                .find(|c| c.display_name == display_name)
                .cloned()
        };
        let Some(candidate) = target else {
            return Err(EnforcementError::UnknownRoute(display_name.to_string()));
        };

        if block {
            self.enforcer
                .enable(display_name, &candidate.address, &candidate.port_range)
                .await?;
        } else {
            self.enforcer.disable(display_name).await?;
        }

        let mut settled = self.candidates.write().await;
        if let Some(held) = settled.iter_mut().find(|c| c.display_name == display_name) {
            held.blocked = block;
        }
        Ok(())
    }

    /// Flips every settled candidate to the opposite of its current blocked
    /// state, concurrently. Per-candidate failures are collected with the
    /// failing display name instead of aborting the batch; failed
    /// candidates keep their last confirmed state.
    pub async fn toggle_all(&self) -> Vec<EnforcementError> {
        let snapshot = self.candidates().await;

        let outcomes: Vec<Result<(), EnforcementError>> = stream::iter(snapshot)
            .map(|candidate| async move {
                self.toggle(&candidate.display_name, !candidate.blocked)
                    .await
            })
            .buffer_unordered(self.parallelism)
            .collect()
            .await;

        outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(()) => None,
                Err(e) => {
                    warn!(error = %e, "toggle failed");
                    Some(e)
                }
            })
            .collect()
    }

    /// Re-probes only the named candidates, in parallel, and writes the new
    /// latencies into the settled view. No fetch or expansion happens;
    /// names with no settled candidate are ignored.
    ///
    /// Returns the updated settled snapshot.
    pub async fn refresh_latency(&self, names: &[String]) -> Vec<Candidate> {
        let targets: Vec<(String, String)> = {
            let settled = self.candidates.read().await;
            settled
                .iter()
                .filter(|c| names.contains(&c.display_name))
                .map(|c| (c.display_name.clone(), c.address.clone()))
                .collect()
        };

        let timeout = self.probe_timeout;
        let measured: Vec<(String, i64)> = stream::iter(targets)
            .map(|(name, address)| {
                let probe = Arc::clone(&self.probe);
                async move {
                    let latency = probe.probe(&address, timeout).await;
                    (name, latency)
                }
            })
            .buffer_unordered(self.parallelism)
            .collect()
            .await;

        let mut settled = self.candidates.write().await;
        for (name, latency) in measured {
            if let Some(held) = settled.iter_mut().find(|c| c.display_name == name) {
                held.latency_ms = latency;
            }
        }
        settled.clone()
    }

    /// Removes every prefixed backend rule, then optimistically marks every
    /// held candidate unblocked without re-querying — justified by
    /// clear-all's guarantee that no prefixed rule remains.
    ///
    /// # Errors
    ///
    /// Returns [`EnforcementError::Clear`] if the backend sweep fails; the
    /// cached flags are left unchanged in that case.
    pub async fn clear_all(&self) -> Result<(), EnforcementError> {
        self.enforcer.clear_all().await?;

        let mut settled = self.candidates.write().await;
        for candidate in settled.iter_mut() {
            candidate.blocked = false;
        }
        Ok(())
    }

    /// Probes and reconciles blocked state for every candidate, bounded by
    /// the worker limit. Each task writes only its own candidate; ordering
    /// across candidates is unspecified.
    async fn evaluate(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let timeout = self.probe_timeout;

        stream::iter(candidates)
            .map(|mut candidate| {
                let probe = Arc::clone(&self.probe);
                let enforcer = Arc::clone(&self.enforcer);
                async move {
                    candidate.latency_ms = probe.probe(&candidate.address, timeout).await;
                    candidate.blocked = match enforcer.is_blocked(&candidate.display_name).await {
                        Ok(blocked) => blocked,
                        Err(e) => {
                            warn!(route = %candidate.display_name, error = %e, "blocked-state lookup failed");
                            false
                        }
                    };
                    candidate
                }
            })
            .buffer_unordered(self.parallelism)
            .collect()
            .await
    }

    fn superseded(&self, round: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != round
    }

    async fn set_phase(&self, round: u64, phase: RoundPhase) {
        let mut guard = self.phase.write().await;
        // Only the newest round owns the observable phase.
        if self.generation.load(Ordering::SeqCst) == round {
            *guard = phase;
        }
    }
}
