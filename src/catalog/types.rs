//! Types for the relay catalog.

use serde::{Deserialize, Serialize};

/// One relay endpoint within a group.
///
/// The port range is carried exactly as the catalog serialized it (bracket
/// and comma syntax for JSON arrays); normalization to the firewall's dash
/// syntax happens downstream so this type stays independent of the catalog
/// protocol version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEndpoint {
    /// Probe target and firewall remote-address value.
    pub address: String,
    /// Opaque port-range string from the catalog.
    pub port_range: String,
}

/// One named region/cluster of relays from the catalog.
///
/// Groups are rebuilt wholesale on every fetch; there is no merge or diff
/// against a previous catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayGroup {
    /// Unique key from the catalog, stable across fetches.
    pub name: String,
    /// Human label; empty when the catalog omits it.
    pub description: String,
    /// Endpoints in catalog order. The order is not semantically meaningful
    /// but must be preserved for deterministic candidate numbering.
    pub endpoints: Vec<RelayEndpoint>,
    /// Whether routing through this group requires a partner credential.
    pub requires_partner_credential: bool,
}

impl RelayGroup {
    /// Returns the number of endpoints in this group.
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}
