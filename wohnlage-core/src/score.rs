//! Bounded score values and the quality score reported per request.

use std::collections::BTreeMap;
use std::fmt;

use crate::{Category, ClimateScores, PointOfInterest};

/// Integer score in the closed range `0..=10`.
///
/// # Examples
/// ```
/// use wohnlage_core::Score;
///
/// assert_eq!(Score::from_f64(9.5).get(), 10);
/// assert_eq!(Score::from_f64(-3.0), Score::MIN);
/// assert_eq!(Score::from_f64(f64::NAN), Score::MIN);
/// assert!(Score::new(11).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Score(u8);

impl Score {
    /// Lowest score.
    pub const MIN: Self = Self(0);
    /// Highest score.
    pub const MAX: Self = Self(10);
    /// Mid-range score reported when inputs are unknown.
    pub const NEUTRAL: Self = Self(5);

    /// Wrap an integer, returning `None` when it exceeds [`Score::MAX`].
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Round half away from zero, then clamp into `0..=10`.
    ///
    /// Non-finite input yields [`Score::MIN`].
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the value is rounded and clamped to 0..=10 before the cast"
    )]
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::MIN;
        }
        Self(value.round().clamp(0.0, 10.0) as u8)
    }

    /// The underlying integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The score as a floating-point value for weighted arithmetic.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The quality-of-life assessment of one location.
///
/// Serialises with one top-level field per category key next to `overall`,
/// the climate scores, the region and the deduplicated amenities per
/// category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct QualityScore {
    /// Weighted overall score.
    pub overall: Score,
    /// Score per category. Every category is present.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub categories: BTreeMap<Category, Score>,
    /// Climate sub-scores and composite.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub climate: ClimateScores,
    /// Resolved region name.
    pub region: Option<String>,
    /// Life satisfaction of the resolved region.
    pub region_satisfaction: Option<f64>,
    /// Deduplicated amenities found per category.
    pub amenities: BTreeMap<Category, Vec<PointOfInterest>>,
    /// Set when the POI source failed and this is the neutral fallback.
    pub fallback: bool,
}

impl QualityScore {
    /// Neutral score returned when the POI source cannot be reached.
    ///
    /// Every category and climate score is 5, the overall score is 6 and no
    /// region or amenities are reported. This is the only place the
    /// `fallback` flag is set.
    ///
    /// # Examples
    /// ```
    /// use wohnlage_core::{Category, QualityScore};
    ///
    /// let fallback = QualityScore::fallback();
    /// assert_eq!(fallback.overall.get(), 6);
    /// assert_eq!(fallback.category(Category::Parks).get(), 5);
    /// ```
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            overall: Score(6),
            categories: Category::ALL
                .into_iter()
                .map(|category| (category, Score::NEUTRAL))
                .collect(),
            climate: ClimateScores::NEUTRAL,
            region: None,
            region_satisfaction: None,
            amenities: BTreeMap::new(),
            fallback: true,
        }
    }

    /// Score for `category`, or [`Score::MIN`] when absent.
    #[must_use]
    pub fn category(&self, category: Category) -> Score {
        self.categories.get(&category).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.49, 0)]
    #[case(0.5, 1)]
    #[case(4.5, 5)]
    #[case(9.49, 9)]
    #[case(42.0, 10)]
    #[case(-0.6, 0)]
    #[case(f64::INFINITY, 0)]
    fn rounds_then_clamps(#[case] raw: f64, #[case] expected: u8) {
        assert_eq!(Score::from_f64(raw).get(), expected);
    }

    #[rstest]
    fn new_rejects_out_of_range() {
        assert_eq!(Score::new(10), Some(Score::MAX));
        assert!(Score::new(11).is_none());
    }

    #[rstest]
    fn fallback_covers_every_category() {
        let fallback = QualityScore::fallback();
        assert_eq!(fallback.categories.len(), Category::ALL.len());
        assert!(fallback.amenities.is_empty());
        assert!(fallback.region.is_none());
        assert!(fallback.fallback);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_flat_category_fields() {
        let json = serde_json::to_value(QualityScore::fallback()).expect("serialise score");
        assert_eq!(json["overall"], 6);
        assert_eq!(json["kindergarten"], 5);
        assert_eq!(json["hairdresser"], 5);
        assert_eq!(json["climateScore"], 5);
        assert_eq!(json["temperatureScore"], 5);
        assert!(json["region"].is_null());
        assert!(json["regionSatisfaction"].is_null());
        assert!(json["amenities"].as_object().is_some_and(serde_json::Map::is_empty));
        assert_eq!(json["fallback"], true);
    }
}
