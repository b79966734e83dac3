//! Built-in and file-based regional reference tables.
//!
//! The embedded table covers the sixteen German federal states: life
//! satisfaction on a 0 to 10 scale and long-term climate normals (mean
//! temperature in °C, precipitation in mm, sunshine in hours per year).
//! Deployments can replace it with a JSON file of the same shape.

use camino::Utf8Path;
use thiserror::Error;
use wohnlage_core::ReferenceTables;

use crate::files::{JsonFileError, read_json_file};

const GERMAN_STATES: &str = include_str!("german_states.json");

/// Error raised while loading reference tables.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    /// A reference file could not be loaded.
    #[error(transparent)]
    File(#[from] JsonFileError),
    /// The embedded table failed to decode.
    #[error("embedded reference table is malformed")]
    Embedded(#[source] serde_json::Error),
    /// A satisfaction value is outside `0..=10` or not finite.
    #[error("satisfaction {value} for region '{region}' is outside 0..=10")]
    InvalidSatisfaction {
        /// Offending region.
        region: String,
        /// Offending value.
        value: f64,
    },
    /// A climate value is not finite.
    #[error("climate normals for region '{region}' are not finite")]
    InvalidClimate {
        /// Offending region.
        region: String,
    },
}

/// Reference tables for the German federal states.
///
/// # Errors
/// Returns [`ReferenceDataError::Embedded`] if the bundled table does not
/// decode, which indicates a packaging fault.
///
/// # Examples
/// ```
/// use wohnlage_data::reference::builtin_reference_tables;
///
/// let tables = builtin_reference_tables()?;
/// assert_eq!(tables.satisfaction("Bayern"), Some(7.2));
/// assert_eq!(tables.lookup("Bavaria").region.as_deref(), Some("Bayern"));
/// # Ok::<(), wohnlage_data::reference::ReferenceDataError>(())
/// ```
pub fn builtin_reference_tables() -> Result<ReferenceTables, ReferenceDataError> {
    let tables = serde_json::from_str(GERMAN_STATES).map_err(ReferenceDataError::Embedded)?;
    validate(tables)
}

/// Load reference tables from a JSON file.
///
/// The file holds two optional objects, `satisfaction` (region to value) and
/// `climate` (region to `{temperature, precipitation, sunshine}`).
///
/// # Errors
/// Returns an error if the file cannot be read or decoded, or if a value is
/// out of range.
pub fn load_reference_tables(path: &Utf8Path) -> Result<ReferenceTables, ReferenceDataError> {
    let tables = read_json_file(path)?;
    log::debug!("loaded reference tables from {path}");
    validate(tables)
}

fn validate(tables: ReferenceTables) -> Result<ReferenceTables, ReferenceDataError> {
    if let Some((region, value)) = tables
        .satisfaction
        .iter()
        .find(|(_, value)| !(value.is_finite() && (0.0..=10.0).contains(*value)))
    {
        return Err(ReferenceDataError::InvalidSatisfaction {
            region: region.clone(),
            value: *value,
        });
    }
    if let Some(region) = tables.climate.iter().find_map(|(region, record)| {
        let finite = [record.temperature, record.precipitation, record.sunshine]
            .iter()
            .all(|value| value.is_finite());
        (!finite).then(|| region.clone())
    }) {
        return Err(ReferenceDataError::InvalidClimate { region });
    }
    Ok(tables)
}
