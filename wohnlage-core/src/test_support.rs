//! In-memory collaborator stubs used by unit and behaviour tests across the
//! workspace.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::{ForwardGeocoder, Place, PoiSource, RawElement, ReverseGeocoder, UpstreamError};

/// `PoiSource` returning a fixed element list or a fixed error.
#[derive(Debug)]
pub struct StubPoiSource {
    result: Result<Vec<RawElement>, UpstreamError>,
    calls: AtomicUsize,
}

impl StubPoiSource {
    /// Return `elements` on every call.
    #[must_use]
    pub const fn with_elements(elements: Vec<RawElement>) -> Self {
        Self {
            result: Ok(elements),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with `error`.
    #[must_use]
    pub const fn with_error(error: UpstreamError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PoiSource for StubPoiSource {
    fn fetch_elements(
        &self,
        _centre: Coord<f64>,
        _radius_metres: f64,
    ) -> Result<Vec<RawElement>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.result.clone()
    }
}

/// Geocoder answering forward and reverse requests with fixed places.
///
/// The default stub finds nothing in either direction.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    forward: Option<Place>,
    reverse: Option<Place>,
    error: Option<UpstreamError>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// Answer forward requests with `place`.
    #[must_use]
    pub fn with_forward(place: Place) -> Self {
        Self {
            forward: Some(place),
            ..Self::default()
        }
    }

    /// Answer reverse requests with `place`.
    #[must_use]
    pub fn with_reverse(place: Place) -> Self {
        Self {
            reverse: Some(place),
            ..Self::default()
        }
    }

    /// Answer requests in both directions with `place`.
    #[must_use]
    pub fn with_place(place: Place) -> Self {
        Self {
            forward: Some(place.clone()),
            reverse: Some(place),
            ..Self::default()
        }
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(error: UpstreamError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Number of requests served so far, in either direction.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn answer(&self, place: Option<&Place>) -> Result<Option<Place>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(place.cloned()),
        }
    }
}

impl ForwardGeocoder for StubGeocoder {
    fn geocode(&self, _address: &str) -> Result<Option<Place>, UpstreamError> {
        self.answer(self.forward.as_ref())
    }
}

impl ReverseGeocoder for StubGeocoder {
    fn reverse_geocode(&self, _location: Coord<f64>) -> Result<Option<Place>, UpstreamError> {
        self.answer(self.reverse.as_ref())
    }
}
