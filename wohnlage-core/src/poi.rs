//! Points of interest as delivered by the POI source and as reported back to
//! callers once classified.

use std::collections::HashMap;

use geo::Coord;

/// OpenStreetMap-style free-form key/value tags.
pub type Tags = HashMap<String, String>;

/// A tagged element exactly as returned by the POI source.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Raw tags attached to the element.
    pub tags: Tags,
}

impl RawElement {
    /// Construct a raw element.
    #[must_use]
    pub const fn new(location: Coord<f64>, tags: Tags) -> Self {
        Self { location, tags }
    }
}

/// A classified location worth counting.
///
/// Created per scoring request and never persisted. `kind` holds the
/// human-readable sub-type (for example `"sports centre"`) when the
/// category distinguishes sub-types.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use geo::Coord;
/// use wohnlage_core::PointOfInterest;
///
/// let poi = PointOfInterest::new(
///     Coord { x: 11.57, y: 48.13 },
///     "Stadtbibliothek",
///     HashMap::from([("amenity".into(), "library".into())]),
/// );
///
/// assert_eq!(poi.lat(), 48.13);
/// assert!(poi.kind.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOfInterest {
    /// Geospatial position.
    #[cfg_attr(feature = "serde", serde(with = "crate::lat_lng"))]
    pub location: Coord<f64>,
    /// Display name; empty when the source carries none.
    pub name: String,
    /// Raw tags carried over from the source element.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub tags: Tags,
    /// Sub-type shown next to the name, when the category has sub-types.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", default, skip_serializing_if = "Option::is_none")
    )]
    pub kind: Option<String>,
}

impl PointOfInterest {
    /// Construct a `PointOfInterest` without a sub-type.
    #[must_use]
    pub fn new(location: Coord<f64>, name: impl Into<String>, tags: Tags) -> Self {
        Self {
            location,
            name: name.into(),
            tags,
            kind: None,
        }
    }

    /// Build a POI from a raw element, taking the name from the `name` tag.
    #[must_use]
    pub fn from_element(element: RawElement) -> Self {
        let name = element.tags.get("name").cloned().unwrap_or_default();
        Self::new(element.location, name, element.tags)
    }

    /// Attach a display sub-type.
    #[must_use]
    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.location.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn name_is_taken_from_tags() {
        let element = RawElement::new(
            Coord { x: 1.0, y: 2.0 },
            Tags::from([("name".into(), "Apotheke am Markt".into())]),
        );
        let poi = PointOfInterest::from_element(element);
        assert_eq!(poi.name, "Apotheke am Markt");
        assert_eq!(poi.lng(), 1.0);
    }

    #[rstest]
    fn missing_name_becomes_empty() {
        let element = RawElement::new(Coord { x: 0.0, y: 0.0 }, Tags::new());
        assert!(PointOfInterest::from_element(element).name.is_empty());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_with_lat_lng_and_type() {
        let poi = PointOfInterest::new(Coord { x: 11.5, y: 48.1 }, "Westpark", Tags::new())
            .with_kind(Some("park".into()));
        let json = serde_json::to_value(&poi).expect("serialise poi");
        assert_eq!(json["location"]["lat"], 48.1);
        assert_eq!(json["location"]["lng"], 11.5);
        assert_eq!(json["type"], "park");
        assert!(json.get("tags").is_none());
    }
}
