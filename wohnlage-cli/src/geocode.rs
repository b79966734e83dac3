//! Geocode command implementation for the Wohnlage CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use wohnlage_cache::{CacheKey, CachedGeocoder, GeocodeCache, SystemClock};
use wohnlage_core::Place;
use wohnlage_data::nominatim::DEFAULT_NOMINATIM_URL;

use crate::{ARG_LAT, ARG_LNG, Backend, CliError, DEFAULT_CACHE_DB, write_json};

/// CLI arguments for the `geocode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve an address to a place, or a coordinate to an \
                 address. Answers from the last 30 days are served from the \
                 cache. Supply either --address or both --lat and --lng.",
    about = "Geocode an address or a coordinate"
)]
#[ortho_config(prefix = "WOHNLAGE")]
pub(crate) struct GeocodeArgs {
    /// Address to geocode.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Latitude to reverse geocode.
    #[arg(long = ARG_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude to reverse geocode.
    #[arg(long = ARG_LNG, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Path to the SQLite cache database.
    #[arg(long = "cache-db", value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Base URL of the Nominatim API.
    #[arg(long = "nominatim-url", value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
}

/// Output of the `geocode` command.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum GeocodeOutput {
    Found(Place),
    NotFound { status: &'static str },
}

impl From<Option<Place>> for GeocodeOutput {
    fn from(place: Option<Place>) -> Self {
        place.map_or(Self::NotFound { status: "not_found" }, Self::Found)
    }
}

pub(crate) fn run_geocode_with(
    args: GeocodeArgs,
    backend: &dyn Backend,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let key = CacheKey::from_request(merged.address.as_deref(), merged.lat, merged.lng)?;
    let nominatim_url = merged
        .nominatim_url
        .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned());
    let cache_db = merged
        .cache_db
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE_DB));

    let upstream = backend.geocoder(&nominatim_url)?;
    let cache = GeocodeCache::open(&cache_db, SystemClock)?;
    let resolved = CachedGeocoder::new(&cache, &*upstream).resolve(&key);
    cache.close()?;
    write_json(writer, &GeocodeOutput::from(resolved?))
}
