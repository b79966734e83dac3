//! Persistent geocode cache and score history for Wohnlage.
//!
//! The crate stores two kinds of immutable snapshots in one `SQLite`
//! database:
//! - **Geocoding results** keyed by address text or by a coordinate rounded
//!   to six decimal places. Entries live for 30 days and are purged lazily
//!   at the start of every lookup.
//! - **Scored locations** with their city, from which
//!   [`GeocodeCache::top_places`] ranks the best recent place per city.
//!
//! [`CachedGeocoder`] puts the cache in front of any upstream geocoder.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use wohnlage_cache::{CachedGeocoder, GeocodeCache, SystemClock};
//! use wohnlage_core::ForwardGeocoder;
//! # use wohnlage_core::test_support::StubGeocoder;
//! # let nominatim = StubGeocoder::default();
//!
//! let cache = GeocodeCache::open(Utf8Path::new("var/geocode.db"), SystemClock)?;
//! let geocoder = CachedGeocoder::new(&cache, nominatim);
//! let place = geocoder.geocode("Marienplatz 1, München")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod clock;
mod error;
mod fs;
mod geocoder;
mod history;
mod key;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CacheError;
pub use geocoder::CachedGeocoder;
pub use history::{ScoredLocation, TopPlace};
pub use key::{COORDINATE_DECIMALS, CacheKey};
pub use store::{CACHE_TTL_DAYS, GeocodeCache};
