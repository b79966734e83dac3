//! Facade crate for the Wohnlage location scoring pipeline.
//!
//! This crate re-exports the core scoring types and exposes the HTTP
//! adapters and the `SQLite` geocode cache behind feature flags.

#![forbid(unsafe_code)]

pub use wohnlage_core::{
    AddressParts, Category, CategoryGroup, CategoryVisibility, CategoryWeighting, ClimateRecord,
    ClimateScores, EnvironmentFactors, ForwardGeocoder, InputError, LocationScorer, Place,
    PoiSource, PointOfInterest, QualityScore, ReferenceTables, ReverseGeocoder, Score,
    ScoreRequest, UpstreamError, haversine_distance_metres,
};

#[cfg(feature = "http")]
pub use wohnlage_data::{
    ClientBuildError, HttpClientConfig, nominatim::NominatimGeocoder, overpass::OverpassPoiSource,
    reference::{ReferenceDataError, builtin_reference_tables, load_reference_tables},
};

#[cfg(feature = "cache-sqlite")]
pub use wohnlage_cache::{
    CacheError, CacheKey, CachedGeocoder, Clock, GeocodeCache, ScoredLocation, SystemClock,
    TopPlace,
};
