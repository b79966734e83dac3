//! Behavioural coverage for cache expiry and top-place ranking.

use std::cell::RefCell;

use chrono::{DateTime, TimeDelta};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wohnlage_cache::{CachedGeocoder, GeocodeCache, ManualClock, ScoredLocation, TopPlace};
use wohnlage_core::test_support::StubGeocoder;
use wohnlage_core::{AddressParts, ForwardGeocoder, Place, Score};

const ADDRESS: &str = "Maximilianstraße 1, Augsburg";

type CacheCell = RefCell<Option<GeocodeCache<ManualClock>>>;

/// Cache under test.
#[fixture]
pub fn cache() -> CacheCell {
    RefCell::new(None)
}

/// Upstream geocoder behind the cache.
#[fixture]
pub fn upstream() -> RefCell<Option<StubGeocoder>> {
    RefCell::new(None)
}

/// Ranked places returned by the cache.
#[fixture]
pub fn ranking() -> RefCell<Vec<TopPlace>> {
    RefCell::new(Vec::new())
}

#[expect(clippy::expect_used, reason = "steps run after the cache is opened")]
fn with_cache<T>(cache: &CacheCell, f: impl FnOnce(&GeocodeCache<ManualClock>) -> T) -> T {
    f(cache.borrow().as_ref().expect("cache opened"))
}

#[expect(clippy::expect_used, reason = "steps run after the upstream is configured")]
fn upstream_calls(upstream: &RefCell<Option<StubGeocoder>>) -> usize {
    upstream.borrow().as_ref().map(StubGeocoder::calls).expect("upstream configured")
}

#[expect(clippy::expect_used, reason = "geocoding must succeed in these scenarios")]
fn geocode_once(cache: &CacheCell, upstream: &RefCell<Option<StubGeocoder>>) {
    let guard = upstream.borrow();
    let stub = guard.as_ref().expect("upstream configured");
    with_cache(cache, |store| {
        let geocoder = CachedGeocoder::new(store, stub);
        let place = geocoder.geocode(ADDRESS).expect("geocode succeeds");
        assert!(place.is_some());
    });
}

#[given("an empty cache on a manual clock")]
#[expect(clippy::expect_used, reason = "in-memory databases open reliably")]
fn empty_cache(#[from(cache)] cache: &CacheCell) {
    let start = DateTime::UNIX_EPOCH + TimeDelta::days(20_000);
    let opened = GeocodeCache::open_in_memory(ManualClock::new(start)).expect("open cache");
    cache.replace(Some(opened));
}

#[given("an upstream geocoder that knows the address")]
fn upstream_knows(#[from(upstream)] upstream: &RefCell<Option<StubGeocoder>>) {
    upstream.replace(Some(StubGeocoder::with_forward(Place {
        location: Coord { x: 10.898_9, y: 48.366_4 },
        display_name: ADDRESS.to_owned(),
        name: None,
        address: AddressParts {
            city: Some("Augsburg".to_owned()),
            state: Some("Bayern".to_owned()),
            ..AddressParts::default()
        },
    })));
}

#[given("scores recorded for Munich, Augsburg and an unknown city")]
#[expect(clippy::expect_used, reason = "inserts into an in-memory database")]
fn scores_recorded(#[from(cache)] cache: &CacheCell) {
    let entries = [
        (Some("München"), 6),
        (Some("Augsburg"), 5),
        (None, 10),
        (Some("München"), 8),
        (Some("Augsburg"), 7),
    ];
    with_cache(cache, |store| {
        for (city, value) in entries {
            let score = Score::new(value).expect("score in range");
            let scored = ScoredLocation::new(Coord { x: 11.0, y: 48.0 }, score).with_city(city);
            store.record_score(&scored).expect("record score");
            store.clock().advance(TimeDelta::minutes(5));
        }
    });
}

#[when("the address is geocoded twice")]
fn geocoded_twice(
    #[from(cache)] cache: &CacheCell,
    #[from(upstream)] upstream: &RefCell<Option<StubGeocoder>>,
) {
    geocode_once(cache, upstream);
    geocode_once(cache, upstream);
}

#[when("thirty-one days pass and the address is geocoded again")]
fn month_passes(
    #[from(cache)] cache: &CacheCell,
    #[from(upstream)] upstream: &RefCell<Option<StubGeocoder>>,
) {
    with_cache(cache, |store| store.clock().advance(TimeDelta::days(31)));
    geocode_once(cache, upstream);
}

#[when("the top places are requested")]
#[expect(clippy::expect_used, reason = "ranking query must succeed")]
fn top_places_requested(
    #[from(cache)] cache: &CacheCell,
    #[from(ranking)] ranking: &RefCell<Vec<TopPlace>>,
) {
    let places = with_cache(cache, |store| store.top_places(10)).expect("top places");
    ranking.replace(places);
}

#[then("the upstream geocoder was asked once")]
fn asked_once(#[from(upstream)] upstream: &RefCell<Option<StubGeocoder>>) {
    assert_eq!(upstream_calls(upstream), 1);
}

#[then("the upstream geocoder was asked twice")]
fn asked_twice(#[from(upstream)] upstream: &RefCell<Option<StubGeocoder>>) {
    assert_eq!(upstream_calls(upstream), 2);
}

#[then("Munich and Augsburg are listed with their best scores")]
fn best_per_city(#[from(ranking)] ranking: &RefCell<Vec<TopPlace>>) {
    let summary: Vec<_> = ranking
        .borrow()
        .iter()
        .map(|place| (place.city.clone(), place.overall.get()))
        .collect();
    assert_eq!(
        summary,
        [("München".to_owned(), 8), ("Augsburg".to_owned(), 7)]
    );
}

#[scenario(path = "tests/features/cache.feature", index = 0)]
fn cached_address_expires(
    cache: CacheCell,
    upstream: RefCell<Option<StubGeocoder>>,
    ranking: RefCell<Vec<TopPlace>>,
) {
    let _ = (cache, upstream, ranking);
}

#[scenario(path = "tests/features/cache.feature", index = 1)]
fn top_places_one_per_city(
    cache: CacheCell,
    upstream: RefCell<Option<StubGeocoder>>,
    ranking: RefCell<Vec<TopPlace>>,
) {
    let _ = (cache, upstream, ranking);
}
