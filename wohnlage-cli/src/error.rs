//! Error types emitted by the Wohnlage CLI.

use std::sync::Arc;

use thiserror::Error;
use wohnlage_cache::CacheError;
use wohnlage_core::{InputError, UpstreamError};
use wohnlage_data::ClientBuildError;
use wohnlage_data::files::JsonFileError;
use wohnlage_data::reference::ReferenceDataError;

/// Errors emitted by the Wohnlage CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The request itself is invalid.
    #[error("invalid request: {0}")]
    InvalidInput(#[from] InputError),
    /// The reference tables could not be loaded.
    #[error("failed to load reference data: {0}")]
    ReferenceData(#[from] ReferenceDataError),
    /// The weights file could not be loaded.
    #[error("failed to load weights: {0}")]
    Weights(#[source] JsonFileError),
    /// Constructing an HTTP adapter failed.
    #[error("failed to build client for {base_url:?}: {source}")]
    BuildClient {
        base_url: String,
        #[source]
        source: ClientBuildError,
    },
    /// The geocode cache failed.
    #[error("geocode cache error: {0}")]
    Cache(#[from] CacheError),
    /// The geocoder could not be reached.
    #[error("geocoder unavailable: {0}")]
    Upstream(#[from] UpstreamError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
