//! Great-circle distance and coordinate validation.
//!
//! Distances use the haversine formula on a spherical earth. The error
//! against an ellipsoidal model stays well below half a percent for the
//! short ranges (< 50 km) the scoring pipeline works with.
//!
//! # Examples
//! ```
//! use geo::Coord;
//! use wohnlage_core::haversine_distance_metres;
//!
//! let berlin = Coord { x: 13.405, y: 52.52 };
//! assert_eq!(haversine_distance_metres(berlin, berlin), 0.0);
//! ```

use geo::Coord;

use crate::InputError;

/// Mean earth radius used for distance calculations, in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Return the great-circle distance between two WGS84 coordinates in metres.
///
/// Coordinates follow the `geo` convention of `x = longitude` and
/// `y = latitude`, both in degrees. The function is symmetric and returns
/// exactly `0.0` for identical inputs.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is inherently floating-point"
)]
pub fn haversine_distance_metres(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let delta_lat = (b.y - a.y).to_radians();
    let delta_lng = (b.x - a.x).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lng / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_METRES * angle
}

/// Validate a latitude/longitude pair and convert it to a [`Coord`].
///
/// # Errors
/// Returns [`InputError::InvalidCoordinate`] when either value is not finite
/// or lies outside the WGS84 range.
///
/// # Examples
/// ```
/// use wohnlage_core::validate_coordinate;
///
/// let coord = validate_coordinate(48.137, 11.575).expect("Munich is valid");
/// assert_eq!(coord.x, 11.575);
/// assert!(validate_coordinate(91.0, 0.0).is_err());
/// ```
pub fn validate_coordinate(lat: f64, lng: f64) -> Result<Coord<f64>, InputError> {
    let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
    let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
    if lat_ok && lng_ok {
        Ok(Coord { x: lng, y: lat })
    } else {
        Err(InputError::InvalidCoordinate { lat, lng })
    }
}
