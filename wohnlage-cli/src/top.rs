//! Top command implementation for the Wohnlage CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use wohnlage_cache::{GeocodeCache, SystemClock};

use crate::{CliError, DEFAULT_CACHE_DB, write_json};

const DEFAULT_LIMIT: usize = 10;

/// CLI arguments for the `top` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "List the best score recorded per city over the last 30 \
                 days, highest first.",
    about = "List the best recently scored place per city"
)]
#[ortho_config(prefix = "WOHNLAGE")]
pub(crate) struct TopArgs {
    /// Maximum number of places to list.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Path to the SQLite cache database.
    #[arg(long = "cache-db", value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
}

pub(crate) fn run_top_with(args: TopArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let limit = merged.limit.unwrap_or(DEFAULT_LIMIT);
    let cache_db = merged
        .cache_db
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE_DB));
    let cache = GeocodeCache::open(&cache_db, SystemClock)?;
    let places = cache.top_places(limit);
    cache.close()?;
    write_json(writer, &places?)
}
