//! History of scored locations and the best place per city.

use chrono::{DateTime, Utc};
use geo::Coord;
use rusqlite::Connection;
use serde::Serialize;
use wohnlage_core::Score;

use crate::store::query_error;
use crate::{CacheError, Clock, GeocodeCache};

const INSERT_SCORE_SQL: &str = "INSERT INTO score_history \
     (lat, lng, label, city, overall, scored_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

// One row per city: the best score, ties broken by recency.
const TOP_PLACES_SQL: &str = "
SELECT lat, lng, label, city, overall, scored_at FROM (
    SELECT id, lat, lng, label, city, overall, scored_at,
           ROW_NUMBER() OVER (
               PARTITION BY city ORDER BY overall DESC, scored_at DESC, id DESC
           ) AS rank_in_city
    FROM score_history
    WHERE city IS NOT NULL AND city <> ''
)
WHERE rank_in_city = 1
ORDER BY overall DESC, scored_at DESC, id DESC
LIMIT ?1";

/// A location that has been scored, ready to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredLocation {
    /// Scored position.
    pub location: Coord<f64>,
    /// Caller-supplied label, usually the address typed in.
    pub label: Option<String>,
    /// City the location lies in.
    pub city: Option<String>,
    /// Overall score.
    pub overall: Score,
}

impl ScoredLocation {
    /// A scored location without label or city.
    #[must_use]
    pub const fn new(location: Coord<f64>, overall: Score) -> Self {
        Self {
            location,
            label: None,
            city: None,
            overall,
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach the city, ignoring blank names.
    #[must_use]
    pub fn with_city(mut self, city: Option<&str>) -> Self {
        self.city = city
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        self
    }
}

/// The best recent score recorded for a city.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPlace {
    /// Latitude of the scored location.
    pub lat: f64,
    /// Longitude of the scored location.
    pub lng: f64,
    /// Label recorded with the score.
    pub label: Option<String>,
    /// City the score represents.
    pub city: String,
    /// Overall score.
    pub overall: Score,
    /// When the score was recorded.
    pub scored_at: DateTime<Utc>,
}

impl<C: Clock> GeocodeCache<C> {
    fn purge_expired_scores(&self, connection: &Connection) -> Result<(), CacheError> {
        let purged = connection
            .execute(
                "DELETE FROM score_history WHERE scored_at < ?1",
                [self.expiry_cutoff()],
            )
            .map_err(query_error("purge expired scores"))?;
        if purged > 0 {
            log::debug!("purged {purged} expired scores");
        }
        Ok(())
    }

    /// Record a scored location, stamped with the current time.
    ///
    /// History older than 30 days is purged before the insert.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the purge or the insert fails.
    pub fn record_score(&self, scored: &ScoredLocation) -> Result<(), CacheError> {
        let scored_at = self.now().timestamp_millis();
        let connection = self.connection()?;
        self.purge_expired_scores(&connection)?;
        connection
            .prepare_cached(INSERT_SCORE_SQL)
            .map_err(query_error("prepare score insert"))?
            .execute((
                scored.location.y,
                scored.location.x,
                scored.label.as_deref(),
                scored.city.as_deref(),
                i64::from(scored.overall.get()),
                scored_at,
            ))
            .map_err(query_error("record score"))?;
        log::debug!(
            "recorded score {} for {}",
            scored.overall,
            scored.city.as_deref().unwrap_or("unknown city")
        );
        Ok(())
    }

    /// Best recent place per city, highest score first.
    ///
    /// History older than 30 days is purged first. Rows without a city are
    /// never returned. At most `limit` places are returned, one per city.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the database cannot be queried or holds
    /// out-of-range values.
    pub fn top_places(&self, limit: usize) -> Result<Vec<TopPlace>, CacheError> {
        let connection = self.connection()?;
        self.purge_expired_scores(&connection)?;

        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut statement = connection
            .prepare_cached(TOP_PLACES_SQL)
            .map_err(query_error("prepare top places query"))?;
        let rows = statement
            .query_map([row_limit], |row| {
                Ok((
                    row.get::<_, f64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })
            .map_err(query_error("query top places"))?;

        let mut places = Vec::new();
        for row in rows {
            let (lat, lng, label, city, raw_score, millis) =
                row.map_err(query_error("read top place row"))?;
            let overall = u8::try_from(raw_score)
                .ok()
                .and_then(Score::new)
                .ok_or(CacheError::InvalidScore { raw: raw_score })?;
            let scored_at = DateTime::from_timestamp_millis(millis)
                .ok_or(CacheError::InvalidTimestamp { millis })?;
            places.push(TopPlace {
                lat,
                lng,
                label,
                city,
                overall,
                scored_at,
            });
        }
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    fn score(value: u8) -> Score {
        Score::new(value).expect("score in range")
    }

    fn scored(city: Option<&str>, value: u8) -> ScoredLocation {
        ScoredLocation::new(Coord { x: 11.5, y: 48.1 }, score(value))
            .with_label(format!("{} {value}", city.unwrap_or("nowhere")))
            .with_city(city)
    }

    #[fixture]
    fn cache() -> GeocodeCache<ManualClock> {
        GeocodeCache::open_in_memory(ManualClock::new(DateTime::UNIX_EPOCH + TimeDelta::days(400)))
            .expect("in-memory cache")
    }

    #[rstest]
    fn best_score_per_city_in_descending_order(cache: GeocodeCache<ManualClock>) {
        for (city, value) in [("München", 6), ("Augsburg", 7), ("München", 8), ("Augsburg", 5)] {
            cache.record_score(&scored(Some(city), value)).expect("record");
        }
        let top = cache.top_places(10).expect("top places");
        let summary: Vec<_> = top.iter().map(|p| (p.city.as_str(), p.overall.get())).collect();
        assert_eq!(summary, [("München", 8), ("Augsburg", 7)]);
    }

    #[rstest]
    fn ties_prefer_the_most_recent(cache: GeocodeCache<ManualClock>) {
        cache
            .record_score(&scored(Some("Köln"), 7).with_label("older"))
            .expect("record");
        cache.clock().advance(TimeDelta::hours(1));
        cache
            .record_score(&scored(Some("Köln"), 7).with_label("newer"))
            .expect("record");
        let top = cache.top_places(5).expect("top places");
        assert_eq!(top.len(), 1);
        assert_eq!(top.first().and_then(|p| p.label.as_deref()), Some("newer"));
    }

    fn history_rows(cache: &GeocodeCache<ManualClock>) -> i64 {
        cache
            .connection()
            .expect("connection")
            .query_row("SELECT COUNT(*) FROM score_history", [], |row| row.get(0))
            .expect("count rows")
    }

    #[rstest]
    fn recording_sweeps_expired_history(cache: GeocodeCache<ManualClock>) {
        cache.record_score(&scored(Some("Bonn"), 4)).expect("record");
        cache.record_score(&scored(Some("Kiel"), 6)).expect("record");
        cache.clock().advance(TimeDelta::days(30) + TimeDelta::seconds(1));
        cache.record_score(&scored(Some("Trier"), 5)).expect("record");
        assert_eq!(history_rows(&cache), 1);
    }

    #[rstest]
    fn recording_keeps_history_within_thirty_days(cache: GeocodeCache<ManualClock>) {
        cache.record_score(&scored(Some("Bonn"), 4)).expect("record");
        cache.clock().advance(TimeDelta::days(30));
        cache.record_score(&scored(Some("Trier"), 5)).expect("record");
        assert_eq!(history_rows(&cache), 2);
    }

    #[rstest]
    fn cityless_rows_are_excluded(cache: GeocodeCache<ManualClock>) {
        cache.record_score(&scored(None, 10)).expect("record");
        cache.record_score(&scored(Some("  "), 10)).expect("record");
        assert!(cache.top_places(10).expect("top places").is_empty());
    }

    #[rstest]
    fn limit_caps_the_result(cache: GeocodeCache<ManualClock>) {
        for (index, city) in ["Bonn", "Trier", "Mainz", "Kiel"].into_iter().enumerate() {
            let value = u8::try_from(index).expect("small index") + 3;
            cache.record_score(&scored(Some(city), value)).expect("record");
        }
        let top = cache.top_places(2).expect("top places");
        let cities: Vec<_> = top.iter().map(|p| p.city.as_str()).collect();
        assert_eq!(cities, ["Kiel", "Mainz"]);
        assert!(cache.top_places(0).expect("top places").is_empty());
    }

    #[rstest]
    fn history_older_than_thirty_days_is_dropped(cache: GeocodeCache<ManualClock>) {
        cache.record_score(&scored(Some("Leipzig"), 9)).expect("record");
        cache.clock().advance(TimeDelta::days(20));
        cache.record_score(&scored(Some("Dresden"), 4)).expect("record");
        cache.clock().advance(TimeDelta::days(11));
        let top = cache.top_places(10).expect("top places");
        let cities: Vec<_> = top.iter().map(|p| p.city.as_str()).collect();
        assert_eq!(cities, ["Dresden"]);
    }
}
