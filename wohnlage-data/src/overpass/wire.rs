//! Overpass API JSON response types.
//!
//! Nodes carry `lat`/`lon` directly. Ways and relations carry a `center`
//! when the query asks for `out center`.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats#JSON>

use std::collections::HashMap;

use geo::Coord;
use serde::Deserialize;

/// Top-level Overpass response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Returned elements in server order.
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    /// Server remark, set when the query hit a runtime error such as a
    /// timeout. The element list may then be partial.
    #[serde(default)]
    pub remark: Option<String>,
}

/// Latitude/longitude pair used for way and relation centres.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// A node, way or relation.
#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    /// `node`, `way` or `relation`.
    #[serde(rename = "type")]
    pub kind: String,
    /// OSM identifier.
    pub id: u64,
    /// Node latitude.
    pub lat: Option<f64>,
    /// Node longitude.
    pub lon: Option<f64>,
    /// Centre of a way or relation.
    pub center: Option<Center>,
    /// OSM tags.
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassElement {
    /// Position of the element, preferring node coordinates over the centre.
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => Some(Coord { x: lon, y: lat }),
            (_, _, Some(Center { lat, lon })) => Some(Coord { x: lon, y: lat }),
            _ => None,
        }
    }
}
