//! Two-level weighting configuration: groups of categories, each level with
//! its own weight and enabled flag.
//!
//! A category contributes to the overall score only when its group is
//! enabled, the item itself is enabled with a non-zero weight, and the
//! caller's [`CategoryVisibility`] does not hide it.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{Category, CategoryGroupKey};

/// Per-category weight inside a group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryItem {
    /// Category this item configures.
    #[cfg_attr(feature = "serde", serde(rename = "key"))]
    pub category: Category,
    /// Multiplier applied on top of the group weight.
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f64,
    /// Whether the category takes part in aggregation.
    #[cfg_attr(feature = "serde", serde(default = "default_enabled"))]
    pub enabled: bool,
}

#[cfg(feature = "serde")]
const fn default_weight() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
const fn default_enabled() -> bool {
    true
}

impl CategoryItem {
    /// An enabled item with weight `1.0`.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            weight: 1.0,
            enabled: true,
        }
    }

    /// Whether the item contributes: enabled and not explicitly zero-weighted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.weight != 0.0
    }
}

/// A titled group of categories sharing a weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryGroup {
    /// Stable identifier, for example `"daily"`.
    pub key: String,
    /// Human-readable title.
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: String,
    /// Weight scaling every category in the group.
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f64,
    /// Disabled groups contribute nothing.
    #[cfg_attr(feature = "serde", serde(default = "default_enabled"))]
    pub enabled: bool,
    /// Categories in the group.
    pub categories: Vec<CategoryItem>,
}

impl CategoryGroup {
    /// The default group for `key` with its default weight and members.
    #[must_use]
    pub fn from_key(key: CategoryGroupKey) -> Self {
        Self {
            key: key.key().to_owned(),
            title: key.title().to_owned(),
            weight: key.default_weight(),
            enabled: true,
            categories: key.categories().map(CategoryItem::new).collect(),
        }
    }
}

/// Errors raised by [`CategoryWeighting::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightingError {
    /// A group weight was negative or not finite.
    #[error("group '{group}' has invalid weight {weight}")]
    InvalidGroupWeight {
        /// Offending group key.
        group: String,
        /// Rejected weight.
        weight: f64,
    },
    /// A category weight was negative or not finite.
    #[error("category '{category}' in group '{group}' has invalid weight {weight}")]
    InvalidCategoryWeight {
        /// Group containing the category.
        group: String,
        /// Offending category.
        category: Category,
        /// Rejected weight.
        weight: f64,
    },
    /// A category appeared in more than one place.
    #[error("category '{category}' is configured more than once")]
    DuplicateCategory {
        /// Repeated category.
        category: Category,
    },
}

/// The full two-level weighting scheme.
///
/// # Examples
/// ```
/// use wohnlage_core::{CategoryVisibility, CategoryWeighting};
///
/// let weighting = CategoryWeighting::default();
/// weighting.validate().expect("defaults are valid");
/// assert_eq!(weighting.active_weights(&CategoryVisibility::default()).count(), 17);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryWeighting {
    /// Groups in display order.
    pub groups: Vec<CategoryGroup>,
}

impl Default for CategoryWeighting {
    fn default() -> Self {
        Self {
            groups: CategoryGroupKey::ALL
                .into_iter()
                .map(CategoryGroup::from_key)
                .collect(),
        }
    }
}

fn valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

impl CategoryWeighting {
    /// Check weights are finite and non-negative and each category appears
    /// at most once.
    ///
    /// # Errors
    /// Returns the first [`WeightingError`] found, scanning groups in order.
    pub fn validate(&self) -> Result<(), WeightingError> {
        let mut seen = HashSet::new();
        for group in &self.groups {
            if !valid_weight(group.weight) {
                return Err(WeightingError::InvalidGroupWeight {
                    group: group.key.clone(),
                    weight: group.weight,
                });
            }
            for item in &group.categories {
                if !valid_weight(item.weight) {
                    return Err(WeightingError::InvalidCategoryWeight {
                        group: group.key.clone(),
                        category: item.category,
                        weight: item.weight,
                    });
                }
                if !seen.insert(item.category) {
                    return Err(WeightingError::DuplicateCategory {
                        category: item.category,
                    });
                }
            }
        }
        Ok(())
    }

    /// Yield `(category, group weight × category weight)` for every category
    /// that takes part in aggregation.
    #[expect(
        clippy::float_arithmetic,
        reason = "effective weights are products of real-valued weights"
    )]
    pub fn active_weights<'a>(
        &'a self,
        visibility: &'a CategoryVisibility,
    ) -> impl Iterator<Item = (Category, f64)> + 'a {
        self.groups
            .iter()
            .filter(|group| group.enabled)
            .flat_map(|group| {
                group
                    .categories
                    .iter()
                    .filter(|item| item.is_active() && visibility.is_visible(item.category))
                    .map(move |item| (item.category, group.weight * item.weight))
            })
    }
}

/// Caller-supplied map hiding categories from aggregation.
///
/// Categories without an entry are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct CategoryVisibility(HashMap<Category, bool>);

impl CategoryVisibility {
    /// Record whether `category` is visible.
    #[must_use]
    pub fn with(mut self, category: Category, visible: bool) -> Self {
        self.0.insert(category, visible);
        self
    }

    /// Whether `category` takes part in aggregation.
    #[must_use]
    pub fn is_visible(&self, category: Category) -> bool {
        self.0.get(&category).copied().unwrap_or(true)
    }
}

impl FromIterator<(Category, bool)> for CategoryVisibility {
    fn from_iter<I: IntoIterator<Item = (Category, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
