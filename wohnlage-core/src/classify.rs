//! Map raw OSM-style tags onto the category taxonomy.
//!
//! Classification walks an ordered rule table top to bottom and stops at the
//! first rule whose clauses match, so an element tagged both
//! `amenity=restaurant` and `shop=bakery` always lands in
//! [`Category::Restaurants`]. Reordering [`RULES`] changes results.
//!
//! # Examples
//! ```
//! use wohnlage_core::{Category, Tags, classify};
//!
//! let tags = Tags::from([("leisure".into(), "sports_centre".into())]);
//! let found = classify(&tags).expect("sports centres are classified");
//! assert_eq!(found.category, Category::Sports);
//! assert_eq!(found.kind.as_deref(), Some("sports centre"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::{Category, Tags};

/// Result of classifying one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Assigned category.
    pub category: Category,
    /// Readable sub-type derived from the matching tag value, for categories
    /// that distinguish sub-types.
    pub kind: Option<String>,
}

/// A tag key together with the values that satisfy it.
#[derive(Debug)]
struct Clause {
    key: &'static str,
    values: &'static [&'static str],
}

impl Clause {
    fn matched_value<'t>(&self, tags: &'t Tags) -> Option<&'t str> {
        tags.get(self.key)
            .map(String::as_str)
            .filter(|value| self.values.contains(value))
    }
}

/// One `(predicate, category)` pair. The predicate holds when any clause
/// matches.
#[derive(Debug)]
struct Rule {
    category: Category,
    clauses: &'static [Clause],
    subtyped: bool,
}

const fn clause(key: &'static str, values: &'static [&'static str]) -> Clause {
    Clause { key, values }
}

/// Ordered rule table. Earlier rules take priority.
const RULES: &[Rule] = &[
    Rule {
        category: Category::Kindergarten,
        clauses: &[clause("amenity", &["kindergarten", "childcare"])],
        subtyped: false,
    },
    Rule {
        category: Category::School,
        clauses: &[clause("amenity", &["school"])],
        subtyped: false,
    },
    Rule {
        category: Category::Supermarket,
        clauses: &[clause(
            "shop",
            &["supermarket", "convenience", "grocery", "discount"],
        )],
        subtyped: false,
    },
    Rule {
        category: Category::Doctors,
        clauses: &[
            clause("amenity", &["doctors", "clinic", "hospital", "dentist"]),
            clause("healthcare", &["doctor", "clinic", "dentist"]),
        ],
        subtyped: true,
    },
    Rule {
        category: Category::Pharmacy,
        clauses: &[
            clause("amenity", &["pharmacy"]),
            clause("healthcare", &["pharmacy"]),
        ],
        subtyped: false,
    },
    Rule {
        category: Category::Culture,
        clauses: &[
            clause(
                "amenity",
                &[
                    "theatre",
                    "cinema",
                    "arts_centre",
                    "library",
                    "community_centre",
                ],
            ),
            clause("tourism", &["museum", "gallery"]),
        ],
        subtyped: true,
    },
    Rule {
        category: Category::Sports,
        clauses: &[clause(
            "leisure",
            &[
                "sports_centre",
                "fitness_centre",
                "stadium",
                "swimming_pool",
                "pitch",
                "track",
                "sports_hall",
            ],
        )],
        subtyped: true,
    },
    Rule {
        category: Category::Parks,
        clauses: &[clause(
            "leisure",
            &["park", "garden", "playground", "nature_reserve"],
        )],
        subtyped: true,
    },
    Rule {
        category: Category::Transport,
        clauses: &[
            clause("highway", &["bus_stop"]),
            clause("railway", &["station", "halt", "tram_stop", "subway_entrance"]),
            clause("public_transport", &["stop_position", "platform", "station"]),
        ],
        subtyped: true,
    },
    Rule {
        category: Category::Cycling,
        clauses: &[
            clause(
                "amenity",
                &["bicycle_rental", "bicycle_parking", "bicycle_repair_station"],
            ),
            clause("shop", &["bicycle"]),
        ],
        subtyped: false,
    },
    Rule {
        category: Category::Restaurants,
        clauses: &[clause(
            "amenity",
            &[
                "restaurant",
                "cafe",
                "fast_food",
                "bar",
                "pub",
                "biergarten",
                "ice_cream",
            ],
        )],
        subtyped: true,
    },
    Rule {
        category: Category::Shopping,
        clauses: &[clause(
            "shop",
            &[
                "bakery",
                "butcher",
                "clothes",
                "shoes",
                "department_store",
                "mall",
                "books",
                "electronics",
                "florist",
                "chemist",
                "kiosk",
                "beverages",
            ],
        )],
        subtyped: true,
    },
    Rule {
        category: Category::Finance,
        clauses: &[clause("amenity", &["bank", "atm", "bureau_de_change"])],
        subtyped: false,
    },
    Rule {
        category: Category::Safety,
        clauses: &[clause("amenity", &["police", "fire_station"])],
        subtyped: false,
    },
    Rule {
        category: Category::Services,
        clauses: &[
            clause("amenity", &["post_office", "townhall", "courthouse"]),
            clause("shop", &["laundry", "dry_cleaning"]),
        ],
        subtyped: false,
    },
    Rule {
        category: Category::Education,
        clauses: &[clause(
            "amenity",
            &[
                "university",
                "college",
                "language_school",
                "music_school",
                "driving_school",
            ],
        )],
        subtyped: true,
    },
    Rule {
        category: Category::Hairdresser,
        clauses: &[clause("shop", &["hairdresser", "beauty"])],
        subtyped: false,
    },
];

/// Every tag key the rule table consults, with the values it accepts.
///
/// Sources use this to restrict their queries to elements that can
/// classify.
#[must_use]
pub fn tag_filters() -> BTreeMap<&'static str, BTreeSet<&'static str>> {
    let mut filters: BTreeMap<&'static str, BTreeSet<&'static str>> = BTreeMap::new();
    for clause in RULES.iter().flat_map(|rule| rule.clauses) {
        filters
            .entry(clause.key)
            .or_default()
            .extend(clause.values.iter().copied());
    }
    filters
}

/// Classify a tag map into at most one category.
///
/// Returns `None` when no rule matches.
#[must_use]
pub fn classify(tags: &Tags) -> Option<Classification> {
    RULES.iter().find_map(|rule| {
        let value = rule
            .clauses
            .iter()
            .find_map(|clause| clause.matched_value(tags))?;
        Some(Classification {
            category: rule.category,
            kind: rule.subtyped.then(|| readable(value)),
        })
    })
}

fn readable(value: &str) -> String {
    value.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    #[case(&[("amenity", "kindergarten")], Category::Kindergarten)]
    #[case(&[("amenity", "childcare")], Category::Kindergarten)]
    #[case(&[("amenity", "school")], Category::School)]
    #[case(&[("shop", "supermarket")], Category::Supermarket)]
    #[case(&[("shop", "discount")], Category::Supermarket)]
    #[case(&[("amenity", "dentist")], Category::Doctors)]
    #[case(&[("healthcare", "doctor")], Category::Doctors)]
    #[case(&[("amenity", "pharmacy")], Category::Pharmacy)]
    #[case(&[("tourism", "museum")], Category::Culture)]
    #[case(&[("leisure", "swimming_pool")], Category::Sports)]
    #[case(&[("leisure", "playground")], Category::Parks)]
    #[case(&[("highway", "bus_stop")], Category::Transport)]
    #[case(&[("railway", "tram_stop")], Category::Transport)]
    #[case(&[("amenity", "bicycle_rental")], Category::Cycling)]
    #[case(&[("amenity", "biergarten")], Category::Restaurants)]
    #[case(&[("shop", "bakery")], Category::Shopping)]
    #[case(&[("amenity", "atm")], Category::Finance)]
    #[case(&[("amenity", "police")], Category::Safety)]
    #[case(&[("amenity", "post_office")], Category::Services)]
    #[case(&[("amenity", "university")], Category::Education)]
    #[case(&[("shop", "hairdresser")], Category::Hairdresser)]
    fn classifies_known_tags(#[case] pairs: &[(&str, &str)], #[case] expected: Category) {
        let found = classify(&tags(pairs)).expect("tag should classify");
        assert_eq!(found.category, expected);
    }

    #[rstest]
    fn first_matching_rule_wins() {
        let found = classify(&tags(&[("amenity", "restaurant"), ("shop", "bakery")]))
            .expect("tag should classify");
        assert_eq!(found.category, Category::Restaurants);
        assert_eq!(found.kind.as_deref(), Some("restaurant"));
    }

    #[rstest]
    fn bicycle_shop_is_cycling_not_shopping() {
        let found = classify(&tags(&[("shop", "bicycle")])).expect("tag should classify");
        assert_eq!(found.category, Category::Cycling);
        assert!(found.kind.is_none());
    }

    #[rstest]
    fn leisure_value_becomes_readable_kind() {
        let found =
            classify(&tags(&[("leisure", "nature_reserve")])).expect("tag should classify");
        assert_eq!(found.kind.as_deref(), Some("nature reserve"));
    }

    #[rstest]
    #[case(&[])]
    #[case(&[("amenity", "parking")])]
    #[case(&[("name", "Marienplatz")])]
    fn unmatched_tags_yield_none(#[case] pairs: &[(&str, &str)]) {
        assert!(classify(&tags(pairs)).is_none());
    }

    #[rstest]
    fn filters_cover_every_rule_key() {
        let filters = tag_filters();
        let keys: Vec<_> = filters.keys().copied().collect();
        assert_eq!(
            keys,
            vec!["amenity", "healthcare", "highway", "leisure", "public_transport", "railway", "shop", "tourism"]
        );
        let shop = filters.get("shop").expect("shop filter");
        assert!(shop.contains("bicycle"));
        assert!(shop.contains("bakery"));
        assert!(!shop.contains("restaurant"));
    }
}
