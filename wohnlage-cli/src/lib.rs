//! Command-line interface for scoring residential locations.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use std::io::Write;
use wohnlage_core::{ForwardGeocoder, PoiSource, ReverseGeocoder};
use wohnlage_data::nominatim::NominatimGeocoder;
use wohnlage_data::overpass::OverpassPoiSource;

mod error;
mod geocode;
mod score;
mod top;

pub use error::CliError;

use geocode::{GeocodeArgs, run_geocode_with};
use score::{ScoreArgs, run_score_with};
use top::{TopArgs, run_top_with};

pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LNG: &str = "lng";
pub(crate) const ENV_SCORE_LAT: &str = "WOHNLAGE_CMDS_SCORE_LAT";
pub(crate) const ENV_SCORE_LNG: &str = "WOHNLAGE_CMDS_SCORE_LNG";

/// Cache database used when none is configured.
pub(crate) const DEFAULT_CACHE_DB: &str = "wohnlage-cache.db";

/// Run the Wohnlage CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid or a command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &HttpBackend, &mut stdout)
}

fn dispatch(
    command: Command,
    backend: &dyn Backend,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Score(args) => run_score_with(args, backend, writer),
        Command::Geocode(args) => run_geocode_with(args, backend, writer),
        Command::Top(args) => run_top_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wohnlage",
    about = "Score the quality of life around residential locations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a location from nearby amenities, climate and region.
    Score(ScoreArgs),
    /// Geocode an address or reverse geocode a coordinate, using the cache.
    Geocode(GeocodeArgs),
    /// List the best recently scored place per city.
    Top(TopArgs),
}

/// Forward and reverse geocoding from one service.
pub(crate) trait Geocoder: ForwardGeocoder + ReverseGeocoder {}

impl<T: ForwardGeocoder + ReverseGeocoder + ?Sized> Geocoder for T {}

/// Builds the upstream collaborators for a command invocation.
pub(crate) trait Backend {
    fn poi_source(&self, base_url: &str) -> Result<Box<dyn PoiSource>, CliError>;
    fn geocoder(&self, base_url: &str) -> Result<Box<dyn Geocoder>, CliError>;
}

/// Overpass and Nominatim over HTTP.
pub(crate) struct HttpBackend;

impl Backend for HttpBackend {
    fn poi_source(&self, base_url: &str) -> Result<Box<dyn PoiSource>, CliError> {
        let source = OverpassPoiSource::new(base_url).map_err(|source| CliError::BuildClient {
            base_url: base_url.to_owned(),
            source,
        })?;
        Ok(Box::new(source))
    }

    fn geocoder(&self, base_url: &str) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = NominatimGeocoder::new(base_url).map_err(|source| CliError::BuildClient {
            base_url: base_url.to_owned(),
            source,
        })?;
        Ok(Box::new(geocoder))
    }
}

pub(crate) fn write_json<T: serde::Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
