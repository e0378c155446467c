//! RelayPicker Core Library
//!
//! Core functionality for RelayPicker - discovering a provider's relay
//! topology, probing each relay's latency, and selectively blocking
//! outbound traffic to chosen relays through a firewall backend so the
//! client application is forced onto a different route.
//!
//! The presentation layer (window, list rendering, user commands) lives
//! outside this crate and drives the [`routes::RouteOrchestrator`].

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod enforce;
pub mod firewall;
pub mod probe;
pub mod routes;

pub use enforce::RouteEnforcer;
pub use routes::{Candidate, RoundPhase, RouteOrchestrator};
