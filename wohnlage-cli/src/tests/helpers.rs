//! Stub collaborators and scratch files shared by the CLI tests.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use std::fs;
use tempfile::TempDir;
use wohnlage_core::test_support::{StubGeocoder, StubPoiSource};
use wohnlage_core::{AddressParts, Place, RawElement, Tags, UpstreamError};

pub(super) const MARIENPLATZ: Coord<f64> = Coord { x: 11.575, y: 48.137 };

/// Backend answering every command from canned data.
#[derive(Debug, Clone, Default)]
pub(super) struct StubBackend {
    pub(super) elements: Vec<RawElement>,
    pub(super) place: Option<Place>,
    pub(super) poi_outage: bool,
}

impl Backend for StubBackend {
    fn poi_source(&self, _base_url: &str) -> Result<Box<dyn PoiSource>, CliError> {
        if self.poi_outage {
            return Ok(Box::new(StubPoiSource::with_error(UpstreamError::Unavailable {
                message: "overpass is overloaded".into(),
            })));
        }
        Ok(Box::new(StubPoiSource::with_elements(self.elements.clone())))
    }

    fn geocoder(&self, _base_url: &str) -> Result<Box<dyn Geocoder>, CliError> {
        Ok(Box::new(
            self.place
                .clone()
                .map_or_else(StubGeocoder::default, StubGeocoder::with_place),
        ))
    }
}

/// A Munich place in Bavaria.
pub(super) fn munich() -> Place {
    Place {
        location: MARIENPLATZ,
        display_name: "Marienplatz, München, Bayern, Deutschland".into(),
        name: Some("Marienplatz".into()),
        address: AddressParts {
            city: Some("München".into()),
            state: Some("Bayern".into()),
            country_code: Some("de".into()),
            ..AddressParts::default()
        },
    }
}

pub(super) fn element(lng: f64, lat: f64, pairs: &[(&str, &str)]) -> RawElement {
    let tags: Tags = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    RawElement::new(Coord { x: lng, y: lat }, tags)
}

/// Scratch directory holding a cache database and input files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn cache_db(&self) -> Utf8PathBuf {
        self.root.join("cache.db")
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write file");
}
