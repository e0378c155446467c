//! Route orchestration.
//!
//! The orchestrator drives one evaluation round end to end: fetch the
//! catalog, expand groups into a flat candidate list, then probe latency
//! and reconcile blocked state for every candidate in parallel, settling
//! into a deterministically sorted view. Toggle, re-ping, and clear-all
//! actions operate on the settled view between rounds.
//!
//! # Round State Machine
//!
//! ```text
//! Idle ──▶ Fetching ──▶ Expanding ──▶ Evaluating ──▶ Settled
//!             │                                         │
//!             ▼                                         │
//!         FetchFailed ◀─────(refresh)───────────────────┘
//! ```
//!
//! A fetch failure is terminal for its round and produces no partial
//! candidates; the previous settled view stays visible. A newer refresh
//! supersedes any in-flight round: the older round's results are discarded,
//! never merged (last refresh wins).

mod error;
mod orchestrator;
mod types;

pub use error::RefreshError;
pub use orchestrator::{RouteOrchestrator, DEFAULT_PROBE_TIMEOUT};
pub use types::{expand_groups, Candidate, RoundPhase};
