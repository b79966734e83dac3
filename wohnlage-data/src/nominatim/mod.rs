//! Forward and reverse geocoding against a Nominatim endpoint.
//!
//! Empty search results and Nominatim's `{"error": …}` reverse answers map
//! to `Ok(None)`. Transport and decoding failures map to
//! [`UpstreamError`].
//!
//! # Example
//!
//! ```no_run
//! use wohnlage_core::ForwardGeocoder;
//! use wohnlage_data::nominatim::NominatimGeocoder;
//!
//! let geocoder = NominatimGeocoder::new("https://nominatim.openstreetmap.org")?;
//! if let Some(place) = geocoder.geocode("Marienplatz 1, München")? {
//!     println!("{}", place.display_name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod wire;

use geo::Coord;
use wohnlage_core::{ForwardGeocoder, Place, ReverseGeocoder, UpstreamError};

use crate::http::{ClientBuildError, HttpClientConfig, JsonClient};

pub use wire::{NominatimAddress, NominatimPlace, ReverseResponse};

/// Public Nominatim instance used when no other is configured.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Geocoder backed by the Nominatim API.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: JsonClient,
}

impl NominatimGeocoder {
    /// Create a geocoder with default timeout and user agent.
    ///
    /// # Errors
    /// Returns an error if the base URL is unusable or the HTTP client or
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(&HttpClientConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
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

impl ForwardGeocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Place>, UpstreamError> {
        let url = self.client.endpoint(
            "search",
            &[
                ("q", address),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ],
        );
        let results: Vec<NominatimPlace> = self.client.get_json(&url)?;
        match results.into_iter().next() {
            Some(found) => found.into_place().map(Some),
            None => {
                log::debug!("Nominatim found nothing for the address");
                Ok(None)
            }
        }
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn reverse_geocode(&self, location: Coord<f64>) -> Result<Option<Place>, UpstreamError> {
        let lat = location.y.to_string();
        let lon = location.x.to_string();
        let url = self.client.endpoint(
            "reverse",
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
            ],
        );
        match self.client.get_json::<ReverseResponse>(&url)? {
            ReverseResponse::Found(found) => found.into_place().map(Some),
            ReverseResponse::Error { error } => {
                log::debug!("Nominatim reverse lookup found nothing: {error}");
                Ok(None)
            }
        }
    }
}
