//! Geocoding through the cache.

use geo::Coord;
use wohnlage_core::{ForwardGeocoder, Place, ReverseGeocoder, UpstreamError};

use crate::{CacheKey, Clock, GeocodeCache, SystemClock};

/// Geocoder that answers from a [`GeocodeCache`] and falls back to an
/// upstream geocoder on a miss.
///
/// Successful upstream answers are stored. Not-found answers and upstream
/// errors are not cached. Cache failures are logged and treated as misses
/// so a broken cache never blocks geocoding.
#[derive(Debug)]
pub struct CachedGeocoder<'c, G, C = SystemClock> {
    cache: &'c GeocodeCache<C>,
    upstream: G,
}

impl<'c, G, C: Clock> CachedGeocoder<'c, G, C> {
    /// Wrap `upstream` with `cache`.
    pub const fn new(cache: &'c GeocodeCache<C>, upstream: G) -> Self {
        Self { cache, upstream }
    }

    /// The cache this geocoder reads and writes.
    #[must_use]
    pub const fn cache(&self) -> &'c GeocodeCache<C> {
        self.cache
    }

    fn cached_or_fresh(
        &self,
        key: &CacheKey,
        fetch: impl FnOnce(&G) -> Result<Option<Place>, UpstreamError>,
    ) -> Result<Option<Place>, UpstreamError> {
        match self.cache.lookup(key) {
            Ok(Some(place)) => {
                log::debug!("geocode cache hit for {key:?}");
                return Ok(Some(place));
            }
            Ok(None) => log::debug!("geocode cache miss for {key:?}"),
            Err(err) => log::warn!("geocode cache lookup failed, asking upstream: {err}"),
        }

        let fresh = fetch(&self.upstream)?;
        if let Some(place) = &fresh
            && let Err(err) = self.cache.store(key, place)
        {
            log::warn!("failed to cache geocode result: {err}");
        }
        Ok(fresh)
    }
}

impl<G, C> CachedGeocoder<'_, G, C>
where
    G: ForwardGeocoder + ReverseGeocoder,
    C: Clock,
{
    /// Resolve a forward or reverse key, cached or fresh.
    ///
    /// # Errors
    /// Propagates the upstream geocoder's error on a cache miss.
    pub fn resolve(&self, key: &CacheKey) -> Result<Option<Place>, UpstreamError> {
        match key {
            CacheKey::Address(address) => {
                self.cached_or_fresh(key, |upstream| upstream.geocode(address))
            }
            CacheKey::Coordinates { lat, lng } => {
                let location = Coord { x: *lng, y: *lat };
                self.cached_or_fresh(key, |upstream| upstream.reverse_geocode(location))
            }
        }
    }
}

impl<G: ForwardGeocoder, C: Clock> ForwardGeocoder for CachedGeocoder<'_, G, C> {
    fn geocode(&self, address: &str) -> Result<Option<Place>, UpstreamError> {
        match CacheKey::address(address) {
            Ok(key) => self.cached_or_fresh(&key, |upstream| upstream.geocode(address)),
            Err(_) => self.upstream.geocode(address),
        }
    }
}

impl<G: ReverseGeocoder, C: Clock> ReverseGeocoder for CachedGeocoder<'_, G, C> {
    fn reverse_geocode(&self, location: Coord<f64>) -> Result<Option<Place>, UpstreamError> {
        match CacheKey::location(location) {
            Ok(key) => self.cached_or_fresh(&key, |upstream| upstream.reverse_geocode(location)),
            Err(_) => self.upstream.reverse_geocode(location),
        }
    }
}
