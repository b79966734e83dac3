//! Core domain types and scoring algorithms for the Wohnlage engine.
//!
//! The crate turns raw, tagged points of interest around a coordinate into a
//! normalised quality-of-life score between 0 and 10. The pipeline runs:
//!
//! 1. [`classify`] maps each tagged element into at most one [`Category`].
//! 2. [`dedupe`] collapses near-duplicates within a category.
//! 3. [`category_score`] converts counts into per-category scores.
//! 4. [`compute_overall`] folds category scores, environmental factors and
//!    regional life satisfaction into an overall score.
//!
//! [`LocationScorer`] wires these steps to the external collaborators
//! described by [`PoiSource`] and [`ReverseGeocoder`]. Collaborator failures
//! never surface to callers; they degrade to neutral fallback values.
//!
//! No global mutable state lives in this crate. Everything is constructed
//! explicitly and passed by reference.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregate;
pub mod category;
pub mod classify;
pub mod climate;
pub mod dedupe;
pub mod distance;
mod error;
#[cfg(feature = "serde")]
mod lat_lng;
mod location;
pub mod poi;
pub mod provider;
pub mod region;
pub mod score;
#[doc(hidden)]
pub mod test_support;
pub mod weighting;

pub use aggregate::{
    EnvironmentFactors, category_score, compute_overall, compute_overall_unweighted,
};
pub use category::{Category, CategoryGroupKey};
pub use classify::{Classification, classify, tag_filters};
pub use climate::{ClimateRecord, ClimateScores, score_climate};
pub use dedupe::{DEFAULT_DEDUP_THRESHOLD_METRES, dedupe, normalise_name};
pub use distance::{EARTH_RADIUS_METRES, haversine_distance_metres, validate_coordinate};
pub use error::{InputError, UpstreamError};
pub use location::{DEFAULT_RADIUS_METRES, LocationScorer, MAX_RADIUS_METRES, ScoreRequest};
pub use poi::{PointOfInterest, RawElement, Tags};
pub use provider::{AddressParts, ForwardGeocoder, Place, PoiSource, ReverseGeocoder};
pub use region::{RegionInfo, RegionResolver, ReferenceTables};
pub use score::{QualityScore, Score};
pub use weighting::{
    CategoryGroup, CategoryItem, CategoryVisibility, CategoryWeighting, WeightingError,
};
