//! Piecewise climate scoring.
//!
//! Each of temperature, precipitation and sunshine is scored against an
//! ideal centre with curves that flatten near the centre and decay away from
//! it. The composite weights the three raw sub-scores and subtracts a fixed
//! penalty when both temperature and precipitation are extreme.

use crate::Score;

const IDEAL_TEMPERATURE: f64 = 11.0;
const IDEAL_PRECIPITATION: f64 = 800.0;
const IDEAL_SUNSHINE: f64 = 1700.0;
const EXTREME_PENALTY: f64 = 1.5;

/// Long-term climate normals for a region.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimateRecord {
    /// Mean annual temperature in °C.
    pub temperature: f64,
    /// Annual precipitation in millimetres.
    pub precipitation: f64,
    /// Annual sunshine duration in hours.
    pub sunshine: f64,
}

/// Rounded climate sub-scores and their composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClimateScores {
    /// Temperature sub-score.
    #[cfg_attr(feature = "serde", serde(rename = "temperatureScore"))]
    pub temperature: Score,
    /// Precipitation sub-score.
    #[cfg_attr(feature = "serde", serde(rename = "precipitationScore"))]
    pub precipitation: Score,
    /// Sunshine sub-score.
    #[cfg_attr(feature = "serde", serde(rename = "sunshineScore"))]
    pub sunshine: Score,
    /// Weighted composite of the three sub-scores.
    #[cfg_attr(feature = "serde", serde(rename = "climateScore"))]
    pub climate: Score,
}

impl ClimateScores {
    /// Scores reported when no climate record is known.
    pub const NEUTRAL: Self = Self {
        temperature: Score::NEUTRAL,
        precipitation: Score::NEUTRAL,
        sunshine: Score::NEUTRAL,
        climate: Score::NEUTRAL,
    };
}

impl Default for ClimateScores {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "scoring curves are defined over real-valued inputs"
)]
fn temperature_score(celsius: f64) -> f64 {
    if celsius < 7.0 {
        return (2.0 - 0.8 * (7.0 - celsius)).max(0.0);
    }
    if celsius > 16.0 {
        return (1.0 - 0.7 * (celsius - 16.0)).max(0.0);
    }
    let delta = (celsius - IDEAL_TEMPERATURE).abs();
    if delta <= 2.0 {
        10.0 - 1.5 * delta
    } else {
        (7.0 - 2.5 * (delta - 2.0)).max(1.0)
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "scoring curves are defined over real-valued inputs"
)]
fn precipitation_score(millimetres: f64) -> f64 {
    if millimetres < 500.0 {
        return (1.0 - (500.0 - millimetres) / 100.0).max(0.0);
    }
    if millimetres > 1200.0 {
        return (1.0 - (millimetres - 1200.0) / 150.0).max(0.0);
    }
    let delta = (millimetres - IDEAL_PRECIPITATION).abs();
    if delta <= 50.0 {
        10.0 - delta / 25.0
    } else if delta <= 150.0 {
        (8.0 - (delta - 50.0) / 20.0).max(3.0)
    } else {
        (3.0 - (delta - 150.0) / 50.0).max(1.0)
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "scoring curves are defined over real-valued inputs"
)]
fn sunshine_score(hours: f64) -> f64 {
    if hours < 1200.0 {
        return (hours / 1200.0 * 6.0).max(1.0);
    }
    if hours > 2200.0 {
        return (8.0 - (hours - 2200.0) / 100.0).max(2.0);
    }
    let delta = (hours - IDEAL_SUNSHINE).abs();
    if delta <= 100.0 {
        10.0 - delta / 50.0
    } else {
        (8.0 - (delta - 100.0) / 80.0).max(3.0)
    }
}

fn is_extreme(record: &ClimateRecord) -> bool {
    let mild_temperature = (8.0..=15.0).contains(&record.temperature);
    let moderate_rain = (600.0..=1100.0).contains(&record.precipitation);
    !mild_temperature && !moderate_rain
}

/// Score a region's climate normals.
///
/// Returns [`ClimateScores::NEUTRAL`] when `record` is `None`.
///
/// # Examples
/// ```
/// use wohnlage_core::{ClimateRecord, ClimateScores, score_climate};
///
/// assert_eq!(score_climate(None), ClimateScores::NEUTRAL);
///
/// let mild = ClimateRecord { temperature: 11.0, precipitation: 800.0, sunshine: 1700.0 };
/// assert_eq!(score_climate(Some(&mild)).climate.get(), 10);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the composite is a weighted sum of real-valued sub-scores"
)]
pub fn score_climate(record: Option<&ClimateRecord>) -> ClimateScores {
    let Some(record) = record else {
        return ClimateScores::NEUTRAL;
    };
    let temperature = temperature_score(record.temperature);
    let precipitation = precipitation_score(record.precipitation);
    let sunshine = sunshine_score(record.sunshine);

    let mut composite = 0.45 * temperature + 0.35 * precipitation + 0.20 * sunshine;
    if is_extreme(record) {
        composite -= EXTREME_PENALTY;
    }

    ClimateScores {
        temperature: Score::from_f64(temperature),
        precipitation: Score::from_f64(precipitation),
        sunshine: Score::from_f64(sunshine),
        climate: Score::from_f64(composite),
    }
}
