//! Points of interest from an Overpass API endpoint.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use wohnlage_core::PoiSource;
//! use wohnlage_data::overpass::OverpassPoiSource;
//!
//! let source = OverpassPoiSource::new("https://overpass-api.de")?;
//! let elements = source.fetch_elements(Coord { x: 11.5755, y: 48.1372 }, 1_000.0)?;
//! println!("{} elements", elements.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod query;
mod wire;

use geo::Coord;
use wohnlage_core::{PoiSource, RawElement, UpstreamError};

use crate::http::{ClientBuildError, HttpClientConfig, JsonClient};

pub use query::{QUERY_TIMEOUT_SECS, build_query};
pub use wire::{Center, OverpassElement, OverpassResponse};

/// Public Overpass instance used when no other is configured.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de";

/// [`PoiSource`] backed by the Overpass API.
#[derive(Debug)]
pub struct OverpassPoiSource {
    client: JsonClient,
}

impl OverpassPoiSource {
    /// Create a source with default timeout and user agent.
    ///
    /// # Errors
    /// Returns an error if the base URL is unusable or the HTTP client or
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(&HttpClientConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is unusable or the HTTP client or
    /// runtime fails to build.
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: JsonClient::new(config)?,
        })
    }
}

/// Convert decoded elements, skipping those without a position.
pub fn convert_response(response: OverpassResponse) -> Vec<RawElement> {
    if let Some(remark) = &response.remark {
        log::warn!("Overpass returned a remark, results may be partial: {remark}");
    }
    response
        .elements
        .into_iter()
        .filter_map(|element| match element.location() {
            Some(location) => Some(RawElement::new(location, element.tags)),
            None => {
                log::debug!("skipping {} {} without coordinates", element.kind, element.id);
                None
            }
        })
        .collect()
}

impl PoiSource for OverpassPoiSource {
    fn fetch_elements(
        &self,
        centre: Coord<f64>,
        radius_metres: f64,
    ) -> Result<Vec<RawElement>, UpstreamError> {
        let query = build_query(centre, radius_metres);
        log::debug!("Overpass query:\n{query}");
        let url = self
            .client
            .endpoint("api/interpreter", &[("data", query.as_str())]);
        let response: OverpassResponse = self.client.get_json(&url)?;
        let elements = convert_response(response);
        log::debug!("Overpass returned {} located elements", elements.len());
        Ok(elements)
    }
}
