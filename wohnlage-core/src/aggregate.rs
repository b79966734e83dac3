//! Fold per-category counts and environmental factors into scores.
//!
//! Category scores saturate at 10 once `count × multiplier` reaches it.
//! The overall score is a weighted mean over the active categories of a
//! [`CategoryWeighting`], adjusted by noise and traffic, blended with the
//! regional life satisfaction and diluted by a fixed slot for factors the
//! pipeline does not measure.

use std::collections::BTreeMap;

use crate::{Category, CategoryVisibility, CategoryWeighting, Score};

/// Share of the noise and traffic terms relative to the weight total.
const ENVIRONMENT_SHARE: f64 = 0.03;
/// Weight slot given to regional life satisfaction.
const SATISFACTION_SHARE: f64 = 0.1;
/// Weight slot for unmeasured factors. It has no numerator contribution.
const OTHER_FACTORS_SHARE: f64 = 0.06;
/// Weight of each environmental term in the unweighted mode.
const FALLBACK_ENVIRONMENT_SHARE: f64 = 0.02;

/// Noise and traffic levels on a 0 to 10 scale, where 10 is worst.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentFactors {
    /// Ambient noise level.
    pub noise: f64,
    /// Road traffic level.
    pub traffic: f64,
}

impl EnvironmentFactors {
    /// Whether both levels are finite and within `0..=10`.
    #[must_use]
    pub fn is_within_scale(&self) -> bool {
        [self.noise, self.traffic]
            .iter()
            .all(|level| (0.0..=10.0).contains(level))
    }
}

impl Default for EnvironmentFactors {
    fn default() -> Self {
        Self {
            noise: 5.0,
            traffic: 5.0,
        }
    }
}

/// Convert a deduplicated count into a category score.
///
/// Computes `min(10, round(count × multiplier))`.
///
/// # Examples
/// ```
/// use wohnlage_core::{Category, category_score};
///
/// assert_eq!(category_score(3, Category::Kindergarten.multiplier()).get(), 6);
/// assert_eq!(category_score(5, Category::Kindergarten.multiplier()).get(), 10);
/// assert_eq!(category_score(19, Category::Transport.multiplier()).get(), 10);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "multipliers are fractional"
)]
pub fn category_score(count: usize, multiplier: f64) -> Score {
    let count = f64::from(u32::try_from(count).unwrap_or(u32::MAX));
    Score::from_f64(count * multiplier)
}

fn score_of(scores: &BTreeMap<Category, Score>, category: Category) -> f64 {
    scores.get(&category).copied().unwrap_or_default().as_f64()
}

/// Weighted overall score.
///
/// 1. Sum `score × group weight × category weight` over active categories
///    and accumulate the weight total.
/// 2. Add `(10 − noise) × 0.03 × total` and `(10 − traffic) × 0.03 × total`
///    to the numerator only.
/// 3. With a satisfaction value, add `round(satisfaction) × 0.1 × total` to
///    the numerator and `0.1 × total` to the total.
/// 4. Add `0.06 × total` to the total.
/// 5. Divide, round and clamp. A zero total yields 0.
///
/// Categories missing from `scores` count as 0.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "weighted means are computed over real-valued weights"
)]
pub fn compute_overall(
    scores: &BTreeMap<Category, Score>,
    weighting: &CategoryWeighting,
    visibility: &CategoryVisibility,
    environment: EnvironmentFactors,
    satisfaction: Option<f64>,
) -> Score {
    let (mut numerator, mut total) = weighting.active_weights(visibility).fold(
        (0.0, 0.0),
        |(numerator, total), (category, weight)| {
            (numerator + score_of(scores, category) * weight, total + weight)
        },
    );

    numerator += (10.0 - environment.noise) * ENVIRONMENT_SHARE * total;
    numerator += (10.0 - environment.traffic) * ENVIRONMENT_SHARE * total;

    if let Some(satisfaction) = satisfaction {
        let slot = SATISFACTION_SHARE * total;
        numerator += satisfaction.round() * slot;
        total += slot;
    }

    total += OTHER_FACTORS_SHARE * total;

    if total > 0.0 {
        Score::from_f64(numerator / total)
    } else {
        Score::MIN
    }
}

/// Fixed share of a category in the unweighted mode.
#[must_use]
pub const fn fallback_share(category: Category) -> f64 {
    match category {
        Category::Kindergarten | Category::Pharmacy => 0.06,
        Category::School | Category::Parks => 0.07,
        Category::Supermarket | Category::Transport => 0.09,
        Category::Doctors => 0.08,
        Category::Culture | Category::Sports | Category::Restaurants | Category::Shopping => 0.05,
        Category::Cycling | Category::Safety | Category::Education | Category::Hairdresser => 0.04,
        Category::Finance | Category::Services => 0.03,
    }
}

/// Overall score used when the caller supplies no weighting.
///
/// Combines the fixed [`fallback_share`] of every category with
/// `0.02 × (10 − noise)` and `0.02 × (10 − traffic)`, then blends the result
/// 90/10 with the satisfaction value when one is known.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the fallback is a linear combination of real-valued terms"
)]
pub fn compute_overall_unweighted(
    scores: &BTreeMap<Category, Score>,
    environment: EnvironmentFactors,
    satisfaction: Option<f64>,
) -> Score {
    let categories: f64 = Category::ALL
        .into_iter()
        .map(|category| score_of(scores, category) * fallback_share(category))
        .sum();
    let base = categories
        + FALLBACK_ENVIRONMENT_SHARE * (10.0 - environment.noise)
        + FALLBACK_ENVIRONMENT_SHARE * (10.0 - environment.traffic);
    let blended = match satisfaction {
        Some(satisfaction) => 0.9 * base + 0.1 * satisfaction,
        None => base,
    };
    Score::from_f64(blended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn uniform(score: u8) -> BTreeMap<Category, Score> {
        let score = Score::new(score).expect("score in range");
        Category::ALL.into_iter().map(|c| (c, score)).collect()
    }

    const LOUD: EnvironmentFactors = EnvironmentFactors {
        noise: 10.0,
        traffic: 10.0,
    };

    #[fixture]
    fn weighting() -> CategoryWeighting {
        CategoryWeighting::default()
    }

    #[rstest]
    #[case(0, 2.0, 0)]
    #[case(1, 0.5, 1)]
    #[case(3, 0.5, 2)]
    #[case(4, 1.5, 6)]
    #[case(100, 0.5, 10)]
    fn category_score_rounds_and_saturates(
        #[case] count: usize,
        #[case] multiplier: f64,
        #[case] expected: u8,
    ) {
        assert_eq!(category_score(count, multiplier).get(), expected);
    }

    #[rstest]
    fn fallback_shares_sum_to_ninety_four_percent() {
        let sum: f64 = Category::ALL.into_iter().map(fallback_share).sum();
        assert!((sum - 0.94).abs() < 1e-9, "got {sum}");
    }

    #[rstest]
    fn other_factors_slot_dilutes_perfect_scores(weighting: CategoryWeighting) {
        // 10 × total / (1.06 × total) = 9.43, so the unmeasured slot keeps a
        // perfect neighbourhood at 9 when noise and traffic add nothing.
        let overall = compute_overall(
            &uniform(10),
            &weighting,
            &CategoryVisibility::default(),
            LOUD,
            None,
        );
        assert_eq!(overall.get(), 9);
    }

    #[rstest]
    fn environment_terms_lift_the_numerator(weighting: CategoryWeighting) {
        // (10 + 2 × 5 × 0.03) / 1.06 = 9.72
        let overall = compute_overall(
            &uniform(10),
            &weighting,
            &CategoryVisibility::default(),
            EnvironmentFactors::default(),
            None,
        );
        assert_eq!(overall.get(), 10);
    }

    #[rstest]
    fn satisfaction_takes_a_tenth_slot(weighting: CategoryWeighting) {
        // (4 + 0.1 × 9) / (1.1 × 1.06) = 4.20
        let overall = compute_overall(
            &uniform(4),
            &weighting,
            &CategoryVisibility::default(),
            LOUD,
            Some(8.6),
        );
        assert_eq!(overall.get(), 4);
    }

    #[rstest]
    fn empty_weighting_scores_zero() {
        let empty = CategoryWeighting { groups: Vec::new() };
        let overall = compute_overall(
            &uniform(10),
            &empty,
            &CategoryVisibility::default(),
            EnvironmentFactors::default(),
            Some(10.0),
        );
        assert_eq!(overall, Score::MIN);
    }

    #[rstest]
    fn disabled_group_matches_zero_weights(weighting: CategoryWeighting) {
        let mut scores = uniform(2);
        scores.insert(Category::Parks, Score::MAX);
        scores.insert(Category::Culture, Score::MAX);

        let mut disabled = weighting.clone();
        let mut zeroed = weighting;
        for group in disabled.groups.iter_mut().filter(|g| g.key == "leisure") {
            group.enabled = false;
        }
        for item in zeroed
            .groups
            .iter_mut()
            .filter(|g| g.key == "leisure")
            .flat_map(|g| g.categories.iter_mut())
        {
            item.weight = 0.0;
        }

        let visibility = CategoryVisibility::default();
        let env = EnvironmentFactors::default();
        assert_eq!(
            compute_overall(&scores, &disabled, &visibility, env, Some(7.0)),
            compute_overall(&scores, &zeroed, &visibility, env, Some(7.0)),
        );
    }

    #[rstest]
    fn unweighted_mode_blends_satisfaction() {
        // base = 0.94 × 10 + 0.02 × 5 × 2 = 9.6; 0.9 × 9.6 + 0.1 × 2 = 8.84
        let with = compute_overall_unweighted(&uniform(10), EnvironmentFactors::default(), Some(2.0));
        assert_eq!(with.get(), 9);
        // 0.94 × 5 + 0.2 = 4.9
        let without = compute_overall_unweighted(&uniform(5), EnvironmentFactors::default(), None);
        assert_eq!(without.get(), 5);
    }
}
