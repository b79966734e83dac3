//! Resolve coordinates to an administrative region and its reference data.
//!
//! The region name comes from a [`ReverseGeocoder`]; satisfaction and climate
//! normals come from static [`ReferenceTables`] keyed by the German region
//! name. English names returned by the geocoder are translated through a
//! fixed alias table before giving up.

use std::collections::HashMap;

use geo::Coord;

use crate::{ClimateRecord, ReverseGeocoder};

/// English names of German federal states mapped to their German names.
const REGION_ALIASES: &[(&str, &str)] = &[
    ("Bavaria", "Bayern"),
    ("Baden-Wuerttemberg", "Baden-Württemberg"),
    ("Lower Saxony", "Niedersachsen"),
    ("North Rhine-Westphalia", "Nordrhein-Westfalen"),
    ("North Rhine Westphalia", "Nordrhein-Westfalen"),
    ("Rhineland-Palatinate", "Rheinland-Pfalz"),
    ("Saxony", "Sachsen"),
    ("Saxony-Anhalt", "Sachsen-Anhalt"),
    ("Thuringia", "Thüringen"),
    ("Hesse", "Hessen"),
    ("Mecklenburg-Western Pomerania", "Mecklenburg-Vorpommern"),
    ("Mecklenburg-West Pomerania", "Mecklenburg-Vorpommern"),
    ("Free Hanseatic City of Bremen", "Bremen"),
    ("Free and Hanseatic City of Hamburg", "Hamburg"),
    ("Land Berlin", "Berlin"),
];

/// Return the German name for an English region alias.
#[must_use]
pub fn region_alias(name: &str) -> Option<&'static str> {
    REGION_ALIASES
        .iter()
        .find(|(english, _)| english.eq_ignore_ascii_case(name))
        .map(|(_, german)| *german)
}

/// Static per-region reference data, loaded once and read-only thereafter.
///
/// # Examples
/// ```
/// use wohnlage_core::{ClimateRecord, ReferenceTables};
///
/// let tables = ReferenceTables::default().with_region(
///     "Bayern",
///     Some(7.1),
///     Some(ClimateRecord { temperature: 8.9, precipitation: 933.0, sunshine: 1750.0 }),
/// );
/// assert_eq!(tables.satisfaction("Bayern"), Some(7.1));
/// assert!(tables.climate("Bavaria").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceTables {
    /// Life satisfaction per region on a 0 to 10 scale.
    #[cfg_attr(feature = "serde", serde(default))]
    pub satisfaction: HashMap<String, f64>,
    /// Climate normals per region.
    #[cfg_attr(feature = "serde", serde(default))]
    pub climate: HashMap<String, ClimateRecord>,
}

impl ReferenceTables {
    /// Add or replace the entries for `region`.
    #[must_use]
    pub fn with_region(
        mut self,
        region: impl Into<String>,
        satisfaction: Option<f64>,
        climate: Option<ClimateRecord>,
    ) -> Self {
        let region = region.into();
        if let Some(value) = satisfaction {
            self.satisfaction.insert(region.clone(), value);
        }
        if let Some(record) = climate {
            self.climate.insert(region, record);
        }
        self
    }

    /// Satisfaction for an exact region name.
    #[must_use]
    pub fn satisfaction(&self, region: &str) -> Option<f64> {
        self.satisfaction.get(region).copied()
    }

    /// Climate normals for an exact region name.
    #[must_use]
    pub fn climate(&self, region: &str) -> Option<ClimateRecord> {
        self.climate.get(region).copied()
    }

    fn knows(&self, region: &str) -> bool {
        self.satisfaction.contains_key(region) || self.climate.contains_key(region)
    }

    /// Look up `name` directly, then through the alias table.
    ///
    /// The returned region is the name the data was found under, or `name`
    /// itself when neither lookup matched.
    #[must_use]
    pub fn lookup(&self, name: &str) -> RegionInfo {
        let canonical = if self.knows(name) {
            Some(name)
        } else {
            region_alias(name).filter(|german| self.knows(german))
        };
        match canonical {
            Some(region) => RegionInfo {
                region: Some(region.to_owned()),
                satisfaction: self.satisfaction(region),
                climate: self.climate(region),
            },
            None => {
                log::debug!("no reference data for region '{name}'");
                RegionInfo {
                    region: Some(name.to_owned()),
                    satisfaction: None,
                    climate: None,
                }
            }
        }
    }
}

/// Region name and the reference data known for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionInfo {
    /// Resolved region name.
    pub region: Option<String>,
    /// Life satisfaction on a 0 to 10 scale.
    pub satisfaction: Option<f64>,
    /// Climate normals.
    pub climate: Option<ClimateRecord>,
}

/// Resolve coordinates to [`RegionInfo`] via a reverse geocoder.
#[derive(Debug, Clone)]
pub struct RegionResolver<R> {
    geocoder: R,
    tables: ReferenceTables,
}

impl<R: ReverseGeocoder> RegionResolver<R> {
    /// Construct a resolver over `geocoder` and `tables`.
    pub const fn new(geocoder: R, tables: ReferenceTables) -> Self {
        Self { geocoder, tables }
    }

    /// Reference tables used for lookups.
    pub const fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Resolve `location` to a region.
    ///
    /// Geocoder failures and empty results degrade to an all-`None`
    /// [`RegionInfo`]; they are logged and never returned.
    pub fn resolve(&self, location: Coord<f64>) -> RegionInfo {
        let place = match self.geocoder.reverse_geocode(location) {
            Ok(place) => place,
            Err(err) => {
                log::warn!(
                    "reverse geocoding ({}, {}) failed: {err}",
                    location.y,
                    location.x
                );
                return RegionInfo::default();
            }
        };
        match place.as_ref().and_then(|p| p.region_name()) {
            Some(name) => self.tables.lookup(name),
            None => {
                log::debug!("no region for ({}, {})", location.y, location.x);
                RegionInfo::default()
            }
        }
    }
}
