//! Cache keys for forward and reverse lookups.

use geo::Coord;
use wohnlage_core::{InputError, validate_coordinate};

/// Decimal places kept for coordinate keys, about 11 cm at the equator.
pub const COORDINATE_DECIMALS: i32 = 6;

/// Identifies a cached lookup.
///
/// Address keys and coordinate keys live in separate key spaces and never
/// match each other.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheKey {
    /// Forward lookup by address text, trimmed.
    Address(String),
    /// Reverse lookup by position, rounded to [`COORDINATE_DECIMALS`].
    Coordinates {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
}

#[expect(
    clippy::float_arithmetic,
    reason = "rounding to a fixed number of decimals scales by a power of ten"
)]
fn round_degrees(value: f64) -> f64 {
    let scale = 10_f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

impl CacheKey {
    /// Key for a forward lookup.
    ///
    /// # Errors
    /// Returns [`InputError::EmptyAddress`] when `address` is blank.
    pub fn address(address: &str) -> Result<Self, InputError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyAddress);
        }
        Ok(Self::Address(trimmed.to_owned()))
    }

    /// Key for a reverse lookup, rounding both axes.
    ///
    /// # Errors
    /// Returns [`InputError::InvalidCoordinate`] for out-of-range input.
    pub fn coordinates(lat: f64, lng: f64) -> Result<Self, InputError> {
        validate_coordinate(lat, lng)?;
        Ok(Self::Coordinates {
            lat: round_degrees(lat),
            lng: round_degrees(lng),
        })
    }

    /// Key for a reverse lookup of `location`.
    ///
    /// # Errors
    /// Returns [`InputError::InvalidCoordinate`] for out-of-range input.
    pub fn location(location: Coord<f64>) -> Result<Self, InputError> {
        Self::coordinates(location.y, location.x)
    }

    /// Build a key from optional request parameters.
    ///
    /// Exactly one of an address or a complete coordinate pair must be
    /// present.
    ///
    /// # Errors
    /// Returns [`InputError::MissingLocation`] when neither is given,
    /// [`InputError::AmbiguousLocation`] when both are,
    /// [`InputError::IncompleteCoordinate`] when only one axis is given, and
    /// the errors of [`CacheKey::address`] and [`CacheKey::coordinates`].
    ///
    /// # Examples
    /// ```
    /// use wohnlage_cache::CacheKey;
    /// use wohnlage_core::InputError;
    ///
    /// let key = CacheKey::from_request(None, Some(48.137_154_9), Some(11.575_382_2))?;
    /// assert_eq!(key, CacheKey::Coordinates { lat: 48.137_155, lng: 11.575_382 });
    /// assert_eq!(
    ///     CacheKey::from_request(Some("Marienplatz"), Some(48.1), Some(11.5)),
    ///     Err(InputError::AmbiguousLocation),
    /// );
    /// # Ok::<(), InputError>(())
    /// ```
    pub fn from_request(
        address: Option<&str>,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Result<Self, InputError> {
        match (address, lat, lng) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(InputError::AmbiguousLocation),
            (Some(text), None, None) => Self::address(text),
            (None, Some(lat_deg), Some(lng_deg)) => Self::coordinates(lat_deg, lng_deg),
            (None, Some(_), None) | (None, None, Some(_)) => Err(InputError::IncompleteCoordinate),
            (None, None, None) => Err(InputError::MissingLocation),
        }
    }

    /// Coordinates as integer micro-degrees, the form stored in `SQLite`.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        reason = "validated degrees scaled by 1e6 fit comfortably in i64"
    )]
    pub(crate) fn micro_degrees(&self) -> Option<(i64, i64)> {
        match self {
            Self::Address(_) => None,
            Self::Coordinates { lat, lng } => {
                let scale = 10_f64.powi(COORDINATE_DECIMALS);
                Some(((lat * scale).round() as i64, (lng * scale).round() as i64))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn address_keys_are_trimmed() {
        assert_eq!(
            CacheKey::address("  Karlsplatz 1, München \n"),
            Ok(CacheKey::Address("Karlsplatz 1, München".into()))
        );
        assert_eq!(CacheKey::address("   "), Err(InputError::EmptyAddress));
    }

    #[rstest]
    #[case(48.137_154_9, 48.137_155)]
    #[case(-33.868_820_04, -33.868_82)]
    #[case(0.000_000_4, 0.0)]
    fn coordinates_round_to_six_decimals(#[case] raw: f64, #[case] expected: f64) {
        let key = CacheKey::coordinates(raw, 10.0).expect("valid coordinate");
        assert_eq!(key, CacheKey::Coordinates { lat: expected, lng: 10.0 });
    }

    #[rstest]
    fn nearby_points_share_a_key() {
        let a = CacheKey::coordinates(48.137_154_91, 11.575_382_2).expect("valid");
        let b = CacheKey::coordinates(48.137_154_94, 11.575_382_4).expect("valid");
        assert_eq!(a, b);
        assert_eq!(a.micro_degrees(), Some((48_137_155, 11_575_382)));
    }

    #[rstest]
    #[case(None, None, None, InputError::MissingLocation)]
    #[case(Some("x"), Some(1.0), Some(2.0), InputError::AmbiguousLocation)]
    #[case(Some("x"), Some(1.0), None, InputError::AmbiguousLocation)]
    #[case(None, Some(1.0), None, InputError::IncompleteCoordinate)]
    #[case(None, None, Some(2.0), InputError::IncompleteCoordinate)]
    #[case(Some(""), None, None, InputError::EmptyAddress)]
    #[case(None, Some(91.0), Some(0.0), InputError::InvalidCoordinate { lat: 91.0, lng: 0.0 })]
    fn rejects_malformed_requests(
        #[case] address: Option<&str>,
        #[case] lat: Option<f64>,
        #[case] lng: Option<f64>,
        #[case] expected: InputError,
    ) {
        assert_eq!(CacheKey::from_request(address, lat, lng), Err(expected));
    }
}
