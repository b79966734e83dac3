//! Upstream data adapters for the Wohnlage scoring pipeline.
//!
//! Responsibilities:
//! - Fetch points of interest from an Overpass endpoint.
//! - Geocode and reverse-geocode through a Nominatim endpoint.
//! - Provide the regional reference tables and JSON file loading.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `wohnlage-core`).
//! - Translate every upstream failure into [`wohnlage_core::UpstreamError`].
//!
//! Invariants:
//! - Adapters are `Send + Sync` and hold no global mutable state.

pub mod files;
mod http;
pub mod nominatim;
pub mod overpass;
pub mod reference;

pub use http::{ClientBuildError, DEFAULT_USER_AGENT, HttpClientConfig};
