//! Capability-based JSON file loading.

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error raised while loading a JSON file.
#[derive(Debug, Error)]
pub enum JsonFileError {
    /// The file could not be opened or read.
    #[error("failed to read {path}")]
    Read {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The contents are not valid JSON for the expected type.
    #[error("failed to parse {path}")]
    Parse {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
}

/// Read and deserialise the JSON document at `path`.
///
/// # Errors
/// Returns [`JsonFileError::Read`] when the file cannot be read and
/// [`JsonFileError::Parse`] when it does not decode as `T`.
pub fn read_json_file<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, JsonFileError> {
    let read_error = |source| JsonFileError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(read_error)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(read_error)?;
    serde_json::from_str(&contents).map_err(|source| JsonFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
