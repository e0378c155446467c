//! Catalog retrieval and decoding.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::error::{CatalogError, CatalogResult};
use super::types::{RelayEndpoint, RelayGroup};

/// Fixed versioned catalog endpoint, including the application identifier.
pub const DEFAULT_CATALOG_URL: &str =
    "https://api.steampowered.com/ISteamApps/GetSDRConfig/v1?appid=730";

/// Substring that signals a group carries live relays.
const RELAY_LIST_MARKER: &str = "relays";

/// Substring that marks a non-production test cluster.
const TEST_CLUSTER_MARKER: &str = "cloud-test";

/// Literal marker for partner-tier id 2 in a group's serialized content.
const PARTNER_TIER_MARKER: &str = r#""partners":2"#;

/// Source of relay catalogs.
///
/// The orchestrator depends on this trait rather than a concrete HTTP
/// client so evaluation rounds can be driven from fixed catalogs in tests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Retrieves and decodes the current relay catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] on transport failure and
    /// [`CatalogError::Decode`] on a malformed payload.
    async fn fetch(&self) -> CatalogResult<Vec<RelayGroup>>;
}

/// Fetches the relay catalog from the provider's HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogFetcher {
    http: reqwest::Client,
    url: String,
}

impl HttpCatalogFetcher {
    /// Creates a fetcher for the given catalog URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for HttpCatalogFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogFetcher {
    async fn fetch(&self) -> CatalogResult<Vec<RelayGroup>> {
        debug!(url = %self.url, "fetching relay catalog");

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let body = response
            .error_for_status()
            .map_err(|e| CatalogError::Network(e.to_string()))?
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let groups = parse_catalog(&body)?;
        debug!(groups = groups.len(), "relay catalog decoded");
        Ok(groups)
    }
}

/// Decodes a raw catalog payload into relay groups.
///
/// The payload must be a JSON document with a top-level `pops` object keyed
/// by opaque group identifiers. A group is included iff its serialized
/// content contains the relay-list marker and does not contain the
/// test-cluster marker. Included groups must then actually carry a `relays`
/// array of objects with a string `ipv4` and a `port_range` field; anything
/// else fails the whole decode, matching upstream behavior.
///
/// The partner-tier flag is a literal substring match against the group's
/// compact serialization. Key-order or numeric-format drift upstream can
/// silently misclassify; swap this for a typed field lookup if the upstream
/// schema ever becomes contractual.
///
/// # Errors
///
/// Returns [`CatalogError::Decode`] on invalid JSON, a missing `pops`
/// object, or an included group with a malformed relay list.
pub fn parse_catalog(raw: &str) -> CatalogResult<Vec<RelayGroup>> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| CatalogError::Decode(format!("invalid JSON: {e}")))?;

    let pops = document
        .get("pops")
        .and_then(Value::as_object)
        .ok_or_else(|| CatalogError::Decode("missing top-level `pops` object".to_string()))?;

    let mut groups = Vec::new();

    for (name, value) in pops {
        let serialized = value.to_string();
        if !serialized.contains(RELAY_LIST_MARKER) || serialized.contains(TEST_CLUSTER_MARKER) {
            continue;
        }

        let description = value
            .get("desc")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let relays = value.get("relays").and_then(Value::as_array).ok_or_else(|| {
            CatalogError::Decode(format!("group `{name}`: expected a `relays` array"))
        })?;

        let mut endpoints = Vec::with_capacity(relays.len());
        for relay in relays {
            let address = relay
                .get("ipv4")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    CatalogError::Decode(format!("group `{name}`: relay missing string `ipv4`"))
                })?
                .to_string();

            let port_range = relay.get("port_range").map(json_text).ok_or_else(|| {
                CatalogError::Decode(format!("group `{name}`: relay missing `port_range`"))
            })?;

            endpoints.push(RelayEndpoint {
                address,
                port_range,
            });
        }

        groups.push(RelayGroup {
            name: name.clone(),
            description,
            endpoints,
            requires_partner_credential: serialized.contains(PARTNER_TIER_MARKER),
        });
    }

    Ok(groups)
}

/// Renders a JSON value the way the catalog's string fields are consumed:
/// strings unquoted, everything else as serialized JSON text.
fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
