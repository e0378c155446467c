//! Types for firewall rules.

use serde::{Deserialize, Serialize};

/// One named outbound block rule.
///
/// Direction (outbound), action (block), and protocol (UDP) are fixed by
/// the backend; a rule is fully described by its name, remote address, and
/// remote port range. The backend's rule set is the authoritative record of
/// "blocked" — the core never keeps a separate source of truth that could
/// diverge from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    /// Rule name; always `prefix + display name` for rules the core owns.
    pub name: String,
    /// Remote address the rule blocks.
    pub remote_address: String,
    /// Remote port range in dash syntax (for example `27015-27068`).
    pub remote_ports: String,
}

impl BlockRule {
    /// Creates a rule from its three identifying fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        remote_address: impl Into<String>,
        remote_ports: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            remote_address: remote_address.into(),
            remote_ports: remote_ports.into(),
        }
    }
}

/// Normalizes a catalog port-range string into the backend's dash syntax.
///
/// The catalog serializes port ranges as JSON arrays (`[27015,27068]`);
/// backends expect `27015-27068`. Already-normalized input passes through
/// unchanged, so callers may normalize defensively.
#[must_use]
pub fn normalize_port_range(raw: &str) -> String {
    raw.replace(',', "-").replace(['[', ']'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bracket_comma_syntax() {
        assert_eq!(normalize_port_range("[27015,27068]"), "27015-27068");
    }

    #[test]
    fn dash_syntax_passes_through() {
        assert_eq!(normalize_port_range("27015-27068"), "27015-27068");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_port_range("[27015,27068]");
        assert_eq!(normalize_port_range(&once), once);
    }

    #[test]
    fn single_port_loses_only_brackets() {
        assert_eq!(normalize_port_range("[27015]"), "27015");
    }

    #[test]
    fn block_rule_new_fills_fields() {
        let rule = BlockRule::new("RelayPicker-Frankfurt 1", "155.133.248.39", "27015-27068");
        assert_eq!(rule.name, "RelayPicker-Frankfurt 1");
        assert_eq!(rule.remote_address, "155.133.248.39");
        assert_eq!(rule.remote_ports, "27015-27068");
    }
}
