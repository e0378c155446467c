//! Relay catalog discovery.
//!
//! This module retrieves the provider's published relay topology and decodes
//! it into a structured catalog of named route groups. Each group carries a
//! human-readable description and an ordered list of relay endpoints
//! (address + opaque port-range string).
//!
//! # Filtering Policy
//!
//! Group inclusion is decided by content-substring heuristics inherited from
//! the upstream format:
//!
//! - a group is included iff its serialized payload signals a relay list and
//!   does not carry the reserved test-cluster marker;
//! - the partner-credential flag is set iff the payload contains the literal
//!   partner-tier marker.
//!
//! Both heuristics are known to be fragile against upstream schema drift and
//! are deliberately confined to [`parse_catalog`] so they can be replaced
//! with structured field checks without touching the orchestrator.
//!
//! # Architecture
//!
//! ```text
//! RouteOrchestrator
//!     │
//!     ▼
//! CatalogSource (trait)
//!     │
//!     ▼
//! HttpCatalogFetcher ──GET──▶ provider catalog endpoint
//!     │
//!     ▼
//! parse_catalog ──▶ Vec<RelayGroup>
//! ```

mod error;
mod fetcher;
mod types;

pub use error::{CatalogError, CatalogResult};
pub use fetcher::{parse_catalog, CatalogSource, HttpCatalogFetcher, DEFAULT_CATALOG_URL};
pub use types::{RelayEndpoint, RelayGroup};
