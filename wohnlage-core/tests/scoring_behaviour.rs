//! Behaviour tests for end-to-end location scoring with stubbed
//! collaborators.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wohnlage_core::test_support::{StubGeocoder, StubPoiSource};
use wohnlage_core::{
    AddressParts, Category, ClimateRecord, LocationScorer, Place, QualityScore, RawElement,
    ReferenceTables, ScoreRequest, Tags, UpstreamError,
};

const CENTRE: Coord<f64> = Coord { x: 11.575, y: 48.137 };

fn element(lng: f64, lat: f64, pairs: &[(&str, &str)]) -> RawElement {
    let tags: Tags = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    RawElement::new(Coord { x: lng, y: lat }, tags)
}

#[fixture]
fn source() -> RefCell<Option<StubPoiSource>> {
    RefCell::new(None)
}

#[fixture]
fn geocoder() -> RefCell<Option<StubGeocoder>> {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> RefCell<Option<QualityScore>> {
    RefCell::new(None)
}

#[given("a POI source with two distinct kindergartens and one duplicate")]
fn given_kindergartens(#[from(source)] source: &RefCell<Option<StubPoiSource>>) {
    source.replace(Some(StubPoiSource::with_elements(vec![
        element(11.575, 48.137, &[("amenity", "kindergarten"), ("name", "Kita Löwenzahn")]),
        element(11.577, 48.139, &[("amenity", "childcare"), ("name", "Krippe Sonnenblume")]),
        element(11.575_2, 48.137, &[("amenity", "kindergarten"), ("name", "Kita Loewenzahn")]),
    ])));
}

#[given("a POI source that times out")]
fn given_timeout(#[from(source)] source: &RefCell<Option<StubPoiSource>>) {
    source.replace(Some(StubPoiSource::with_error(UpstreamError::Timeout {
        url: "https://overpass.example/api/interpreter".into(),
        timeout_secs: 25,
    })));
}

#[given("a POI source with a restaurant also tagged as a bakery")]
fn given_restaurant_bakery(#[from(source)] source: &RefCell<Option<StubPoiSource>>) {
    source.replace(Some(StubPoiSource::with_elements(vec![element(
        11.575,
        48.137,
        &[("amenity", "restaurant"), ("shop", "bakery"), ("name", "Backstube")],
    )])));
}

#[given("a reverse geocoder placing the point in Bavaria")]
fn given_bavaria(#[from(geocoder)] geocoder: &RefCell<Option<StubGeocoder>>) {
    geocoder.replace(Some(StubGeocoder::with_reverse(Place {
        location: CENTRE,
        display_name: "Marienplatz, Munich, Bavaria, Germany".into(),
        name: None,
        address: AddressParts {
            city: Some("Munich".into()),
            state: Some("Bavaria".into()),
            country_code: Some("de".into()),
            ..AddressParts::default()
        },
    })));
}

#[given("a reverse geocoder that is unavailable")]
fn given_geocoder_down(#[from(geocoder)] geocoder: &RefCell<Option<StubGeocoder>>) {
    geocoder.replace(Some(StubGeocoder::with_error(UpstreamError::Network {
        url: "https://nominatim.example/reverse".into(),
        message: "connection refused".into(),
    })));
}

#[expect(clippy::expect_used, reason = "test steps require configured stubs")]
#[when("I score the location")]
fn when_score(
    #[from(source)] source: &RefCell<Option<StubPoiSource>>,
    #[from(geocoder)] geocoder: &RefCell<Option<StubGeocoder>>,
    #[from(outcome)] outcome: &RefCell<Option<QualityScore>>,
) {
    let tables = ReferenceTables::default().with_region(
        "Bayern",
        Some(7.2),
        Some(ClimateRecord {
            temperature: 8.9,
            precipitation: 933.0,
            sunshine: 1750.0,
        }),
    );
    let scorer = LocationScorer::new(
        source.take().expect("POI source configured"),
        geocoder.take().expect("geocoder configured"),
        tables,
    );
    let score = scorer
        .score(&ScoreRequest::new(CENTRE).with_label("Marienplatz 1"))
        .expect("request is valid");
    outcome.replace(Some(score));
}

#[expect(clippy::expect_used, reason = "scenario must have scored")]
fn scored(outcome: &RefCell<Option<QualityScore>>) -> QualityScore {
    outcome.borrow().clone().expect("location scored")
}

#[then("the kindergarten score is 4")]
fn then_kindergarten(#[from(outcome)] outcome: &RefCell<Option<QualityScore>>) {
    let score = scored(outcome);
    assert_eq!(score.category(Category::Kindergarten).get(), 4);
    assert_eq!(
        score.amenities.get(&Category::Kindergarten).map(Vec::len),
        Some(2)
    );
}

#[then("the region is Bayern with its satisfaction")]
fn then_bayern(#[from(outcome)] outcome: &RefCell<Option<QualityScore>>) {
    let score = scored(outcome);
    assert_eq!(score.region.as_deref(), Some("Bayern"));
    assert_eq!(score.region_satisfaction, Some(7.2));
}

#[then("the neutral fallback score is returned")]
fn then_fallback(#[from(outcome)] outcome: &RefCell<Option<QualityScore>>) {
    assert_eq!(scored(outcome), QualityScore::fallback());
}

#[then("no region is reported")]
fn then_no_region(#[from(outcome)] outcome: &RefCell<Option<QualityScore>>) {
    let score = scored(outcome);
    assert!(score.region.is_none());
    assert!(score.region_satisfaction.is_none());
}

#[then("the restaurant is counted and shopping is empty")]
fn then_restaurant(#[from(outcome)] outcome: &RefCell<Option<QualityScore>>) {
    let score = scored(outcome);
    assert_eq!(score.category(Category::Restaurants).get(), 1);
    assert_eq!(score.category(Category::Shopping).get(), 0);
    assert!(!score.amenities.contains_key(&Category::Shopping));
}

#[scenario(path = "tests/features/scoring.feature", index = 0)]
fn deduplicated_kindergartens(
    source: RefCell<Option<StubPoiSource>>,
    geocoder: RefCell<Option<StubGeocoder>>,
    outcome: RefCell<Option<QualityScore>>,
) {
    let _ = (source, geocoder, outcome);
}

#[scenario(path = "tests/features/scoring.feature", index = 1)]
fn poi_source_outage(
    source: RefCell<Option<StubPoiSource>>,
    geocoder: RefCell<Option<StubGeocoder>>,
    outcome: RefCell<Option<QualityScore>>,
) {
    let _ = (source, geocoder, outcome);
}

#[scenario(path = "tests/features/scoring.feature", index = 2)]
fn geocoder_outage(
    source: RefCell<Option<StubPoiSource>>,
    geocoder: RefCell<Option<StubGeocoder>>,
    outcome: RefCell<Option<QualityScore>>,
) {
    let _ = (source, geocoder, outcome);
}

#[scenario(path = "tests/features/scoring.feature", index = 3)]
fn restaurant_bakery(
    source: RefCell<Option<StubPoiSource>>,
    geocoder: RefCell<Option<StubGeocoder>>,
    outcome: RefCell<Option<QualityScore>>,
) {
    let _ = (source, geocoder, outcome);
}
