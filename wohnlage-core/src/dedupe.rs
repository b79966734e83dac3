//! Collapse near-duplicate points of interest within a category.
//!
//! Two items are duplicates when they lie closer than the threshold and their
//! normalised names are equal or one contains the other. The first
//! occurrence always survives, so the order of the input acts as the
//! tie-break. Items are never sorted.

use crate::{PointOfInterest, haversine_distance_metres};

/// Proximity threshold applied when callers have no better value, in metres.
pub const DEFAULT_DEDUP_THRESHOLD_METRES: f64 = 50.0;

/// Normalise a display name for duplicate detection.
///
/// Lowercases, transliterates German umlauts and `ß`, strips punctuation,
/// collapses runs of whitespace and trims.
///
/// # Examples
/// ```
/// use wohnlage_core::normalise_name;
///
/// assert_eq!(normalise_name("  Bäckerei   Müller-Groß "), "baeckerei muellergross");
/// ```
#[must_use]
pub fn normalise_name(name: &str) -> String {
    let mut transliterated = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        match ch {
            'ä' => transliterated.push_str("ae"),
            'ö' => transliterated.push_str("oe"),
            'ü' => transliterated.push_str("ue"),
            'ß' => transliterated.push_str("ss"),
            c if c.is_alphanumeric() || c.is_whitespace() => transliterated.push(c),
            _ => {}
        }
    }
    transliterated.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An empty name is a substring of every name, so an unnamed item matches
/// any nearby item.
fn names_match(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}

/// Remove later occurrences that duplicate an already accepted item.
///
/// Runs in `O(n²)` over the accepted set, which stays small for the bounded
/// search radius the pipeline uses.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wohnlage_core::{DEFAULT_DEDUP_THRESHOLD_METRES, PointOfInterest, Tags, dedupe};
///
/// let a = PointOfInterest::new(Coord { x: 11.5, y: 48.1 }, "Rewe", Tags::new());
/// let b = PointOfInterest::new(Coord { x: 11.500_1, y: 48.1 }, "REWE City", Tags::new());
/// let kept = dedupe(vec![a.clone(), b], DEFAULT_DEDUP_THRESHOLD_METRES);
/// assert_eq!(kept, vec![a]);
/// ```
#[must_use]
pub fn dedupe(items: Vec<PointOfInterest>, threshold_metres: f64) -> Vec<PointOfInterest> {
    let mut accepted: Vec<(String, PointOfInterest)> = Vec::with_capacity(items.len());
    for item in items {
        let name = normalise_name(&item.name);
        let duplicate = accepted.iter().any(|(kept_name, kept)| {
            haversine_distance_metres(kept.location, item.location) < threshold_metres
                && names_match(kept_name, &name)
        });
        if duplicate {
            log::trace!("dropping duplicate '{}'", item.name);
        } else {
            accepted.push((name, item));
        }
    }
    accepted.into_iter().map(|(_, poi)| poi).collect()
}
