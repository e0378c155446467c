//! Types for route evaluation rounds.

use serde::{Deserialize, Serialize};

use crate::catalog::RelayGroup;
use crate::firewall::normalize_port_range;
use crate::probe::UNREACHABLE_MS;

/// One addressable, probeable, blockable unit derived from a group endpoint.
///
/// The display name is the join key between application state and backend
/// rule names: as long as a group's description and the endpoint's ordinal
/// are unchanged, the name is stable across fetches, so a rule created in
/// one round still matches its candidate in the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// `"{description} {ordinal}"`, ordinal 1-based within the owning group.
    pub display_name: String,
    /// Probe target and firewall remote-address value.
    pub address: String,
    /// Firewall remote-port value, dash syntax.
    pub port_range: String,
    /// Last measured round-trip latency; `-1` means unreachable/unknown.
    pub latency_ms: i64,
    /// Blocked state as of the last reconciliation against the backend.
    pub blocked: bool,
}

impl Candidate {
    /// Returns whether the last probe reached this candidate.
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        self.latency_ms >= 0
    }
}

/// Phase of the current evaluation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round has run yet.
    Idle,
    /// Retrieving the catalog.
    Fetching,
    /// Flattening groups into candidates.
    Expanding,
    /// Probing and reconciling blocked state in parallel.
    Evaluating,
    /// The round completed; the candidate view is consistent.
    Settled,
    /// The fetch failed; no candidates were produced for this round.
    FetchFailed,
}

/// Flattens relay groups into a candidate list.
///
/// Ordinals start at 1 and reset per group; port ranges are normalized to
/// the backend's dash syntax here so every candidate is firewall-ready.
/// Latency starts at the unreachable sentinel and blocked at `false` until
/// evaluation fills them in.
#[must_use]
pub fn expand_groups(groups: &[RelayGroup]) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for group in groups {
        for (index, endpoint) in group.endpoints.iter().enumerate() {
            candidates.push(Candidate {
                display_name: format!("{} {}", group.description, index + 1),
                address: endpoint.address.clone(),
                port_range: normalize_port_range(&endpoint.port_range),
                latency_ms: UNREACHABLE_MS,
                blocked: false,
            });
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RelayEndpoint;

    fn group(name: &str, description: &str, addresses: &[&str]) -> RelayGroup {
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

    #[test]
    fn ordinals_reset_per_group() {
        let groups = vec![
            group("fra", "Frankfurt", &["1.1.1.1", "1.1.1.2"]),
            group("iad", "Sterling", &["2.2.2.1"]),
        ];

        let candidates = expand_groups(&groups);
        let names: Vec<&str> = candidates.iter().map(|c| c.display_name.as_str()).collect();

        assert_eq!(names, vec!["Frankfurt 1", "Frankfurt 2", "Sterling 1"]);
    }

    #[test]
    fn expansion_normalizes_port_ranges() {
        let groups = vec![group("fra", "Frankfurt", &["1.1.1.1"])];
        let candidates = expand_groups(&groups);

        assert_eq!(candidates[0].port_range, "27015-27068");
    }

    #[test]
    fn fresh_candidates_are_unknown_and_unblocked() {
        let groups = vec![group("fra", "Frankfurt", &["1.1.1.1"])];
        let candidates = expand_groups(&groups);

        assert_eq!(candidates[0].latency_ms, UNREACHABLE_MS);
        assert!(!candidates[0].blocked);
        assert!(!candidates[0].is_reachable());
    }

    #[test]
    fn empty_group_expands_to_nothing() {
        let groups = vec![group("fra", "Frankfurt", &[])];
        assert!(expand_groups(&groups).is_empty());
    }

    #[test]
    fn display_names_unique_for_distinct_descriptions() {
        let groups = vec![
            group("fra", "Frankfurt", &["1.1.1.1", "1.1.1.2", "1.1.1.3"]),
            group("iad", "Sterling", &["2.2.2.1", "2.2.2.2"]),
            group("sgp", "Singapore", &["3.3.3.1"]),
        ];

        let candidates = expand_groups(&groups);
        let mut names: Vec<&str> = candidates.iter().map(|c| c.display_name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), total, "display names must be unique in a round");
    }

    #[test]
    fn candidate_serializes_round_trip() {
        let candidate = Candidate {
            display_name: "Frankfurt 1".to_string(),
            address: "155.133.248.39".to_string(),
            port_range: "27015-27068".to_string(),
            latency_ms: 23,
            blocked: true,
        };

        let json = serde_json::to_string(&candidate).expect("candidate must serialize");
        let back: Candidate = serde_json::from_str(&json).expect("candidate must deserialize");
        assert_eq!(back, candidate);
    }
}
