//! End-to-end scoring of a single location.

use std::collections::BTreeMap;

use geo::Coord;

use crate::{
    Category, CategoryVisibility, CategoryWeighting, DEFAULT_DEDUP_THRESHOLD_METRES,
    EnvironmentFactors, InputError, PointOfInterest, PoiSource, QualityScore, ReferenceTables,
    RegionResolver, ReverseGeocoder, Score, category_score, classify, compute_overall,
    compute_overall_unweighted, dedupe, score_climate, validate_coordinate,
};

/// Largest accepted search radius in metres.
pub const MAX_RADIUS_METRES: f64 = 50_000.0;

/// Search radius used when the caller does not choose one, in metres.
pub const DEFAULT_RADIUS_METRES: f64 = 1_000.0;

/// Parameters of one scoring request.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wohnlage_core::{EnvironmentFactors, ScoreRequest};
///
/// let request = ScoreRequest::new(Coord { x: 11.57, y: 48.13 })
///     .with_label("Marienplatz 1")
///     .with_radius(1_500.0);
/// assert_eq!(request.radius_metres, 1_500.0);
/// assert_eq!(request.environment, EnvironmentFactors::default());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    /// Point to score.
    pub location: Coord<f64>,
    /// Free-form address label shown to users.
    pub label: Option<String>,
    /// Search radius around `location` in metres.
    pub radius_metres: f64,
    /// Two-level weighting. `None` selects the fixed unweighted mode.
    pub weighting: Option<CategoryWeighting>,
    /// Categories hidden by the caller.
    pub visibility: Option<CategoryVisibility>,
    /// Noise and traffic levels.
    pub environment: EnvironmentFactors,
}

impl ScoreRequest {
    /// A request with the default radius and environment.
    #[must_use]
    pub fn new(location: Coord<f64>) -> Self {
        Self {
            location,
            label: None,
            radius_metres: DEFAULT_RADIUS_METRES,
            weighting: None,
            visibility: None,
            environment: EnvironmentFactors::default(),
        }
    }

    /// Attach an address label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the search radius.
    #[must_use]
    pub const fn with_radius(mut self, radius_metres: f64) -> Self {
        self.radius_metres = radius_metres;
        self
    }

    /// Use a two-level weighting.
    #[must_use]
    pub fn with_weighting(mut self, weighting: CategoryWeighting) -> Self {
        self.weighting = Some(weighting);
        self
    }

    /// Hide categories from aggregation.
    #[must_use]
    pub fn with_visibility(mut self, visibility: CategoryVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Override the noise and traffic levels.
    #[must_use]
    pub const fn with_environment(mut self, environment: EnvironmentFactors) -> Self {
        self.environment = environment;
        self
    }

    fn validate(&self) -> Result<(), InputError> {
        validate_coordinate(self.location.y, self.location.x)?;
        let radius = self.radius_metres;
        if !(radius.is_finite() && radius > 0.0 && radius <= MAX_RADIUS_METRES) {
            return Err(InputError::InvalidRadius {
                radius_metres: radius,
                max_metres: MAX_RADIUS_METRES,
            });
        }
        if !self.environment.is_within_scale() {
            return Err(InputError::InvalidEnvironment {
                noise: self.environment.noise,
                traffic: self.environment.traffic,
            });
        }
        if let Some(weighting) = &self.weighting {
            weighting.validate()?;
        }
        Ok(())
    }
}

/// Scores locations from a POI source and a reverse geocoder.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wohnlage_core::test_support::{StubGeocoder, StubPoiSource};
/// use wohnlage_core::{LocationScorer, ReferenceTables, ScoreRequest, UpstreamError};
///
/// let scorer = LocationScorer::new(
///     StubPoiSource::with_error(UpstreamError::Unavailable { message: "down".into() }),
///     StubGeocoder::default(),
///     ReferenceTables::default(),
/// );
/// let score = scorer
///     .score(&ScoreRequest::new(Coord { x: 11.57, y: 48.13 }))
///     .expect("valid request");
/// assert_eq!(score.overall.get(), 6);
/// ```
#[derive(Debug)]
pub struct LocationScorer<P, R> {
    source: P,
    resolver: RegionResolver<R>,
    dedup_threshold_metres: f64,
}

impl<P: PoiSource, R: ReverseGeocoder> LocationScorer<P, R> {
    /// Construct a scorer.
    pub const fn new(source: P, geocoder: R, tables: ReferenceTables) -> Self {
        Self {
            source,
            resolver: RegionResolver::new(geocoder, tables),
            dedup_threshold_metres: DEFAULT_DEDUP_THRESHOLD_METRES,
        }
    }

    /// Override the deduplication distance.
    #[must_use]
    pub const fn with_dedup_threshold(mut self, metres: f64) -> Self {
        self.dedup_threshold_metres = metres;
        self
    }

    /// Score `request`.
    ///
    /// A failing POI source yields [`QualityScore::fallback`] instead of an
    /// error. A failing geocoder only drops the region data.
    ///
    /// # Errors
    /// Returns [`InputError`] for an invalid coordinate, radius or weighting.
    pub fn score(&self, request: &ScoreRequest) -> Result<QualityScore, InputError> {
        request.validate()?;

        let elements = match self
            .source
            .fetch_elements(request.location, request.radius_metres)
        {
            Ok(elements) => elements,
            Err(err) => {
                log::warn!("POI source failed, returning neutral score: {err}");
                return Ok(QualityScore::fallback());
            }
        };
        let fetched = elements.len();

        let mut amenities: BTreeMap<Category, Vec<PointOfInterest>> = BTreeMap::new();
        for element in elements {
            if let Some(found) = classify(&element.tags) {
                amenities
                    .entry(found.category)
                    .or_default()
                    .push(PointOfInterest::from_element(element).with_kind(found.kind));
            }
        }
        for items in amenities.values_mut() {
            *items = dedupe(std::mem::take(items), self.dedup_threshold_metres);
        }

        let categories: BTreeMap<Category, Score> = Category::ALL
            .into_iter()
            .map(|category| {
                let count = amenities.get(&category).map_or(0, Vec::len);
                (category, category_score(count, category.multiplier()))
            })
            .collect();

        let region = self.resolver.resolve(request.location);
        let climate = score_climate(region.climate.as_ref());
        let all_visible = CategoryVisibility::default();
        let overall = match &request.weighting {
            Some(weighting) => compute_overall(
                &categories,
                weighting,
                request.visibility.as_ref().unwrap_or(&all_visible),
                request.environment,
                region.satisfaction,
            ),
            None => compute_overall_unweighted(
                &categories,
                request.environment,
                region.satisfaction,
            ),
        };

        log::debug!(
            "scored {} ({}, {}): {fetched} elements, {} kept, overall {overall}",
            request.label.as_deref().unwrap_or("unlabelled location"),
            request.location.y,
            request.location.x,
            amenities.values().map(Vec::len).sum::<usize>(),
        );

        Ok(QualityScore {
            overall,
            categories,
            climate,
            region: region.region,
            region_satisfaction: region.satisfaction,
            amenities,
            fallback: false,
        })
    }

    /// Reference tables used for region lookups.
    pub const fn tables(&self) -> &ReferenceTables {
        self.resolver.tables()
    }
}
