//! Overpass QL query construction.

use geo::Coord;
use wohnlage_core::tag_filters;

/// Server-side query timeout in seconds.
pub const QUERY_TIMEOUT_SECS: u32 = 25;

/// Build a query returning every node and way within `radius_metres` of
/// `centre` whose tags the classifier can match.
///
/// Ways are returned with their centre point via `out center tags`.
#[must_use]
pub fn build_query(centre: Coord<f64>, radius_metres: f64) -> String {
    let around = format!(
        "(around:{radius_metres:.0},{lat:.6},{lng:.6})",
        lat = centre.y,
        lng = centre.x
    );
    let mut query = format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n");
    for (key, values) in tag_filters() {
        let pattern = values.into_iter().collect::<Vec<_>>().join("|");
        for selector in ["node", "way"] {
            query.push_str(&format!(
                "  {selector}[\"{key}\"~\"^({pattern})$\"]{around};\n"
            ));
        }
    }
    query.push_str(");\nout center tags;");
    query
}
