//! Score command implementation for the Wohnlage CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use wohnlage_cache::{CachedGeocoder, GeocodeCache, ScoredLocation, SystemClock};
use wohnlage_core::{
    CategoryGroup, CategoryVisibility, CategoryWeighting, EnvironmentFactors, InputError,
    LocationScorer, QualityScore, ReferenceTables, ReverseGeocoder, ScoreRequest,
    validate_coordinate,
};
use wohnlage_data::files::read_json_file;
use wohnlage_data::nominatim::DEFAULT_NOMINATIM_URL;
use wohnlage_data::overpass::DEFAULT_OVERPASS_URL;
use wohnlage_data::reference::{builtin_reference_tables, load_reference_tables};

use crate::{
    ARG_LAT, ARG_LNG, Backend, CliError, DEFAULT_CACHE_DB, ENV_SCORE_LAT, ENV_SCORE_LNG,
    write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score a location by counting amenities within a radius, \
                 weighting them by category, and blending in regional \
                 climate and life satisfaction. Service URLs and data files \
                 can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Score the quality of life around a coordinate"
)]
#[ortho_config(prefix = "WOHNLAGE")]
pub(crate) struct ScoreArgs {
    /// Latitude in degrees.
    #[arg(long = ARG_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude in degrees.
    #[arg(long = ARG_LNG, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Address label recorded with the score.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) label: Option<String>,
    /// Search radius in metres.
    #[arg(long, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Noise level from 0 (silent) to 10.
    #[arg(long, value_name = "level")]
    #[serde(default)]
    pub(crate) noise: Option<f64>,
    /// Traffic level from 0 (none) to 10.
    #[arg(long, value_name = "level")]
    #[serde(default)]
    pub(crate) traffic: Option<f64>,
    /// JSON file with `categoryGroups` and `categoryVisibility`.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
    /// JSON file replacing the built-in regional reference tables.
    #[arg(long = "reference-data", value_name = "path")]
    #[serde(default)]
    pub(crate) reference_data: Option<Utf8PathBuf>,
    /// Path to the SQLite cache database.
    #[arg(long = "cache-db", value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Base URL of the Overpass API.
    #[arg(long = "overpass-url", value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Base URL of the Nominatim API.
    #[arg(long = "nominatim-url", value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    pub(crate) location: Coord<f64>,
    pub(crate) label: Option<String>,
    pub(crate) radius_metres: Option<f64>,
    pub(crate) environment: EnvironmentFactors,
    pub(crate) weights: Option<Utf8PathBuf>,
    pub(crate) reference_data: Option<Utf8PathBuf>,
    pub(crate) cache_db: Utf8PathBuf,
    pub(crate) overpass_url: String,
    pub(crate) nominatim_url: String,
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_SCORE_LAT,
        })?;
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_SCORE_LNG,
        })?;
        let location = validate_coordinate(lat, lng)?;
        let defaults = EnvironmentFactors::default();
        let environment = EnvironmentFactors {
            noise: args.noise.unwrap_or(defaults.noise),
            traffic: args.traffic.unwrap_or(defaults.traffic),
        };
        if !environment.is_within_scale() {
            return Err(CliError::InvalidInput(InputError::InvalidEnvironment {
                noise: environment.noise,
                traffic: environment.traffic,
            }));
        }
        Ok(Self {
            location,
            label: args.label.filter(|label| !label.trim().is_empty()),
            radius_metres: args.radius,
            environment,
            weights: args.weights,
            reference_data: args.reference_data,
            cache_db: args
                .cache_db
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE_DB)),
            overpass_url: args
                .overpass_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            nominatim_url: args
                .nominatim_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
        })
    }
}

/// Caller-supplied weighting, in the shape the web front end sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WeightsFile {
    #[serde(default)]
    pub(crate) category_groups: Option<Vec<CategoryGroup>>,
    #[serde(default)]
    pub(crate) category_visibility: Option<CategoryVisibility>,
}

pub(crate) fn load_weights(path: &Utf8Path) -> Result<WeightsFile, CliError> {
    read_json_file(path).map_err(CliError::Weights)
}

fn load_tables(path: Option<&Utf8Path>) -> Result<ReferenceTables, CliError> {
    let tables = match path {
        Some(file) => load_reference_tables(file)?,
        None => builtin_reference_tables()?,
    };
    Ok(tables)
}

fn build_request(config: &ScoreConfig) -> Result<ScoreRequest, CliError> {
    let mut request = ScoreRequest::new(config.location).with_environment(config.environment);
    if let Some(label) = &config.label {
        request = request.with_label(label.clone());
    }
    if let Some(radius) = config.radius_metres {
        request = request.with_radius(radius);
    }
    if let Some(path) = &config.weights {
        let weights = load_weights(path)?;
        if let Some(groups) = weights.category_groups {
            request = request.with_weighting(CategoryWeighting { groups });
        }
        if let Some(visibility) = weights.category_visibility {
            request = request.with_visibility(visibility);
        }
    }
    Ok(request)
}

pub(crate) fn run_score_with(
    args: ScoreArgs,
    backend: &dyn Backend,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let request = build_request(&config)?;
    let tables = load_tables(config.reference_data.as_deref())?;
    let cache = GeocodeCache::open(&config.cache_db, SystemClock)?;
    let outcome = score_and_record(&config, &request, tables, &cache, backend);
    cache.close()?;
    write_json(writer, &outcome?)
}

fn score_and_record(
    config: &ScoreConfig,
    request: &ScoreRequest,
    tables: ReferenceTables,
    cache: &GeocodeCache,
    backend: &dyn Backend,
) -> Result<QualityScore, CliError> {
    let source = backend.poi_source(&config.overpass_url)?;
    let upstream = backend.geocoder(&config.nominatim_url)?;
    let geocoder = CachedGeocoder::new(cache, &*upstream);
    let scorer = LocationScorer::new(&*source, &geocoder, tables);
    let score = scorer.score(request)?;

    if score.fallback {
        log::info!("not recording the fallback score");
        return Ok(score);
    }

    // The region lookup during scoring has already cached this place.
    let city = match geocoder.reverse_geocode(config.location) {
        Ok(place) => place.and_then(|found| found.city().map(str::to_owned)),
        Err(err) => {
            log::warn!("could not resolve the city for the score history: {err}");
            None
        }
    };
    let mut scored = ScoredLocation::new(config.location, score.overall).with_city(city.as_deref());
    if let Some(label) = &config.label {
        scored = scored.with_label(label.clone());
    }
    cache.record_score(&scored)?;
    Ok(score)
}
