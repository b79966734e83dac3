//! The closed category taxonomy used for scoring.
//!
//! Every category carries a count multiplier that converts a deduplicated
//! count into a 0–10 score, and belongs to exactly one default group.
//!
//! # Examples
//! ```
//! use wohnlage_core::{Category, CategoryGroupKey};
//!
//! assert_eq!(Category::Kindergarten.key(), "kindergarten");
//! assert_eq!(Category::Transport.to_string(), "transport");
//! assert_eq!(Category::Parks.group(), CategoryGroupKey::Leisure);
//! ```

use std::fmt;
use std::str::FromStr;

/// A scoring category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Category {
    /// Kindergartens and childcare.
    Kindergarten,
    /// Primary and secondary schools.
    School,
    /// Supermarkets and grocery stores.
    Supermarket,
    /// Doctors, clinics, hospitals and dentists.
    Doctors,
    /// Pharmacies.
    Pharmacy,
    /// Theatres, cinemas, libraries and museums.
    Culture,
    /// Sports centres, pitches and pools.
    Sports,
    /// Parks, gardens and playgrounds.
    Parks,
    /// Public transport stops and stations.
    Transport,
    /// Bicycle rental, parking and shops.
    Cycling,
    /// Restaurants, cafés and bars.
    Restaurants,
    /// Non-food retail and bakeries.
    Shopping,
    /// Banks and cash machines.
    Finance,
    /// Police and fire stations.
    Safety,
    /// Post offices, town halls and similar services.
    Services,
    /// Universities, colleges and adult education.
    Education,
    /// Hairdressers and beauty salons.
    Hairdresser,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Self; 17] = [
        Self::Kindergarten,
        Self::School,
        Self::Supermarket,
        Self::Doctors,
        Self::Pharmacy,
        Self::Culture,
        Self::Sports,
        Self::Parks,
        Self::Transport,
        Self::Cycling,
        Self::Restaurants,
        Self::Shopping,
        Self::Finance,
        Self::Safety,
        Self::Services,
        Self::Education,
        Self::Hairdresser,
    ];

    /// Return the category key as a lowercase `&str`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Kindergarten => "kindergarten",
            Self::School => "school",
            Self::Supermarket => "supermarket",
            Self::Doctors => "doctors",
            Self::Pharmacy => "pharmacy",
            Self::Culture => "culture",
            Self::Sports => "sports",
            Self::Parks => "parks",
            Self::Transport => "transport",
            Self::Cycling => "cycling",
            Self::Restaurants => "restaurants",
            Self::Shopping => "shopping",
            Self::Finance => "finance",
            Self::Safety => "safety",
            Self::Services => "services",
            Self::Education => "education",
            Self::Hairdresser => "hairdresser",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kindergarten => "Kindergartens",
            Self::School => "Schools",
            Self::Supermarket => "Supermarkets",
            Self::Doctors => "Doctors",
            Self::Pharmacy => "Pharmacies",
            Self::Culture => "Culture",
            Self::Sports => "Sports",
            Self::Parks => "Parks",
            Self::Transport => "Public transport",
            Self::Cycling => "Cycling",
            Self::Restaurants => "Restaurants & cafés",
            Self::Shopping => "Shopping",
            Self::Finance => "Banks",
            Self::Safety => "Safety",
            Self::Services => "Services",
            Self::Education => "Education",
            Self::Hairdresser => "Hairdressers",
        }
    }

    /// Multiplier converting a deduplicated count into a 0–10 score.
    ///
    /// A higher multiplier saturates sooner: kindergartens reach 10 at five
    /// occurrences, transit stops need twenty.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Kindergarten
            | Self::School
            | Self::Pharmacy
            | Self::Finance
            | Self::Safety
            | Self::Hairdresser => 2.0,
            Self::Supermarket => 1.5,
            Self::Doctors
            | Self::Culture
            | Self::Sports
            | Self::Parks
            | Self::Services
            | Self::Education => 1.0,
            Self::Transport | Self::Cycling | Self::Restaurants | Self::Shopping => 0.5,
        }
    }

    /// Default group the category belongs to.
    #[must_use]
    pub const fn group(self) -> CategoryGroupKey {
        match self {
            Self::Supermarket
            | Self::Pharmacy
            | Self::Finance
            | Self::Services
            | Self::Hairdresser => CategoryGroupKey::Daily,
            Self::Doctors | Self::Safety => CategoryGroupKey::Health,
            Self::Kindergarten | Self::School | Self::Education => CategoryGroupKey::Family,
            Self::Transport | Self::Cycling => CategoryGroupKey::Mobility,
            Self::Culture | Self::Sports | Self::Parks | Self::Restaurants | Self::Shopping => {
                CategoryGroupKey::Leisure
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.key() == wanted)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Default grouping of categories for two-level weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CategoryGroupKey {
    /// Everyday errands.
    Daily,
    /// Medical care and safety.
    Health,
    /// Childcare and education.
    Family,
    /// Getting around without a car.
    Mobility,
    /// Free time.
    Leisure,
}

impl CategoryGroupKey {
    /// Every group in display order.
    pub const ALL: [Self; 5] = [
        Self::Daily,
        Self::Health,
        Self::Family,
        Self::Mobility,
        Self::Leisure,
    ];

    /// Return the group key as a lowercase `&str`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Health => "health",
            Self::Family => "family",
            Self::Mobility => "mobility",
            Self::Leisure => "leisure",
        }
    }

    /// Human-readable group title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Daily => "Daily needs",
            Self::Health => "Health & safety",
            Self::Family => "Family & education",
            Self::Mobility => "Mobility",
            Self::Leisure => "Leisure",
        }
    }

    /// Default group weight.
    #[must_use]
    pub const fn default_weight(self) -> f64 {
        match self {
            Self::Daily => 1.2,
            Self::Health | Self::Family | Self::Mobility => 1.0,
            Self::Leisure => 0.8,
        }
    }

    /// Categories that belong to this group by default.
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL
            .into_iter()
            .filter(move |category| category.group() == self)
    }
}

impl fmt::Display for CategoryGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
