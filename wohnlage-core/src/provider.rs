//! Interfaces to the external collaborators the pipeline depends on.
//!
//! Implementations live in `wohnlage-data` (HTTP adapters) and
//! `wohnlage-cache` (a caching decorator). All traits are synchronous; async
//! adapters block on their own runtime internally.

use geo::Coord;

use crate::{RawElement, UpstreamError};

/// Structured address components of a geocoded place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AddressParts {
    /// City, town or village.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub city: Option<String>,
    /// Street name.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub road: Option<String>,
    /// House number.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub house_number: Option<String>,
    /// Postal code.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub postcode: Option<String>,
    /// Country name.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub country_code: Option<String>,
    /// State or other first-level administrative region.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub state: Option<String>,
}

/// A location resolved by a geocoder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Place {
    /// Resolved position.
    #[cfg_attr(feature = "serde", serde(with = "crate::lat_lng"))]
    pub location: Coord<f64>,
    /// Full display label.
    pub display_name: String,
    /// Short name of the feature, when it has one.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Address components.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: AddressParts,
}

impl Place {
    /// The city the place lies in, if known.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.address.city.as_deref()
    }

    /// The administrative region, falling back to the city.
    #[must_use]
    pub fn region_name(&self) -> Option<&str> {
        self.address.state.as_deref().or_else(|| self.city())
    }
}

/// Fetch tagged elements around a centre point.
pub trait PoiSource: Send + Sync {
    /// Return every element within `radius_metres` of `centre`.
    ///
    /// # Errors
    /// Returns [`UpstreamError`] when the source is unavailable or its
    /// response cannot be decoded.
    fn fetch_elements(
        &self,
        centre: Coord<f64>,
        radius_metres: f64,
    ) -> Result<Vec<RawElement>, UpstreamError>;
}

/// Resolve an address string to a place.
pub trait ForwardGeocoder: Send + Sync {
    /// Geocode `address`. `Ok(None)` means nothing was found.
    ///
    /// # Errors
    /// Returns [`UpstreamError`] when the geocoder cannot be reached.
    fn geocode(&self, address: &str) -> Result<Option<Place>, UpstreamError>;
}

/// Resolve a coordinate to a place.
pub trait ReverseGeocoder: Send + Sync {
    /// Reverse geocode `location`. `Ok(None)` means nothing was found.
    ///
    /// # Errors
    /// Returns [`UpstreamError`] when the geocoder cannot be reached.
    fn reverse_geocode(&self, location: Coord<f64>) -> Result<Option<Place>, UpstreamError>;
}

impl<T: PoiSource + ?Sized> PoiSource for &T {
    fn fetch_elements(
        &self,
        centre: Coord<f64>,
        radius_metres: f64,
    ) -> Result<Vec<RawElement>, UpstreamError> {
        (**self).fetch_elements(centre, radius_metres)
    }
}

impl<T: ReverseGeocoder + ?Sized> ReverseGeocoder for &T {
    fn reverse_geocode(&self, location: Coord<f64>) -> Result<Option<Place>, UpstreamError> {
        (**self).reverse_geocode(location)
    }
}

impl<T: ForwardGeocoder + ?Sized> ForwardGeocoder for &T {
    fn geocode(&self, address: &str) -> Result<Option<Place>, UpstreamError> {
        (**self).geocode(address)
    }
}
