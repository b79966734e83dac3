//! Error taxonomy shared by the scoring pipeline and its collaborators.

use thiserror::Error;

use crate::WeightingError;

/// Invalid caller input.
///
/// These errors are surfaced to callers and correspond to a client-side
/// mistake (a 4xx-equivalent signal for HTTP front ends).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Latitude or longitude was not finite or fell outside the WGS84 range.
    #[error("invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate {
        /// Latitude supplied by the caller.
        lat: f64,
        /// Longitude supplied by the caller.
        lng: f64,
    },
    /// Only one half of a latitude/longitude pair was supplied.
    #[error("latitude and longitude must be supplied together")]
    IncompleteCoordinate,
    /// Neither an address nor a coordinate was supplied.
    #[error("either an address or a coordinate is required")]
    MissingLocation,
    /// Both an address and a coordinate were supplied.
    #[error("supply an address or a coordinate, not both")]
    AmbiguousLocation,
    /// The address string was empty after trimming.
    #[error("address must not be empty")]
    EmptyAddress,
    /// The search radius was not a positive, bounded number of metres.
    #[error("search radius {radius_metres} m must be positive and at most {max_metres} m")]
    InvalidRadius {
        /// Radius supplied by the caller.
        radius_metres: f64,
        /// Largest radius the pipeline accepts.
        max_metres: f64,
    },
    /// Noise or traffic was not a finite level between 0 and 10.
    #[error("noise {noise} and traffic {traffic} must both lie between 0 and 10")]
    InvalidEnvironment {
        /// Noise level supplied by the caller.
        noise: f64,
        /// Traffic level supplied by the caller.
        traffic: f64,
    },
    /// The supplied category weighting failed validation.
    #[error("invalid category weighting")]
    InvalidWeighting(#[from] WeightingError),
}

/// Failure of an external collaborator (POI source or geocoder).
///
/// The scoring pipeline recovers from these locally; they are never
/// surfaced to end users as hard failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The request did not complete before the configured timeout.
    #[error("request to {url} timed out after {timeout_secs} s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
    /// The collaborator is not reachable in this configuration.
    #[error("service unavailable: {message}")]
    Unavailable {
        /// Reason reported by the adapter.
        message: String,
    },
}
