//! SQLite-backed geocode cache with a 30-day time to live.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use camino::Utf8Path;
use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{Connection, OptionalExtension};
use wohnlage_core::Place;

use crate::fs::ensure_parent_dir;
use crate::{CacheError, CacheKey, Clock, SystemClock};

/// Days a cached entry or score stays valid.
pub const CACHE_TTL_DAYS: i64 = 30;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS geocode_cache (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    address TEXT,
    lat_e6 INTEGER,
    lng_e6 INTEGER,
    place TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    CHECK ((address IS NULL) <> (lat_e6 IS NULL AND lng_e6 IS NULL))
);
CREATE INDEX IF NOT EXISTS geocode_cache_by_address ON geocode_cache (address);
CREATE INDEX IF NOT EXISTS geocode_cache_by_coordinates ON geocode_cache (lat_e6, lng_e6);
CREATE TABLE IF NOT EXISTS score_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    label TEXT,
    city TEXT,
    overall INTEGER NOT NULL,
    scored_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS score_history_by_time ON score_history (scored_at);
";

const SELECT_PLACE_SQL: &str = "SELECT place FROM geocode_cache \
     WHERE address IS ?1 AND lat_e6 IS ?2 AND lng_e6 IS ?3 \
     ORDER BY created_at DESC, id DESC LIMIT 1";
const INSERT_PLACE_SQL: &str = "INSERT INTO geocode_cache \
     (address, lat_e6, lng_e6, place, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";

pub(crate) fn query_error(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> CacheError {
    move |source| CacheError::Query { operation, source }
}

/// Persistent store of geocoding results and scored locations.
///
/// Entries are immutable snapshots. Writes only insert, so concurrent
/// writers for one key leave several rows and lookups return the newest.
/// Expired rows are deleted lazily at the start of every read.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wohnlage_cache::{CacheKey, GeocodeCache, SystemClock};
/// use wohnlage_core::{AddressParts, Place};
///
/// let cache = GeocodeCache::open_in_memory(SystemClock)?;
/// let key = CacheKey::address("Marienplatz 1, München")?;
/// assert!(cache.lookup(&key)?.is_none());
///
/// let place = Place {
///     location: Coord { x: 11.5755, y: 48.1372 },
///     display_name: "Marienplatz 1, München".into(),
///     name: None,
///     address: AddressParts::default(),
/// };
/// cache.store(&key, &place)?;
/// assert_eq!(cache.lookup(&key)?, Some(place));
/// cache.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct GeocodeCache<C = SystemClock> {
    connection: Mutex<Connection>,
    clock: C,
}

impl<C: Clock> GeocodeCache<C> {
    /// Open or create the database at `path`.
    ///
    /// Missing parent directories are created. File-backed databases use
    /// write-ahead logging so readers do not block the writer.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the directory, database or schema cannot
    /// be created.
    pub fn open(path: &Utf8Path, clock: C) -> Result<Self, CacheError> {
        ensure_parent_dir(path).map_err(|source| CacheError::CreateParent {
            path: path.to_path_buf(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| CacheError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        let mode: String = connection
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(query_error("enable write-ahead logging"))?;
        log::debug!("opened geocode cache at {path} (journal mode {mode})");
        Self::initialise(connection, clock)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`CacheError`] when `SQLite` cannot create the schema.
    pub fn open_in_memory(clock: C) -> Result<Self, CacheError> {
        let connection = Connection::open_in_memory().map_err(|source| CacheError::OpenDatabase {
            path: ":memory:".into(),
            source,
        })?;
        Self::initialise(connection, clock)
    }

    fn initialise(connection: Connection, clock: C) -> Result<Self, CacheError> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(query_error("set busy timeout"))?;
        connection
            .execute_batch(SCHEMA)
            .map_err(query_error("create cache schema"))?;
        Ok(Self {
            connection: Mutex::new(connection),
            clock,
        })
    }

    /// Close the database, reporting any error `SQLite` raises.
    ///
    /// # Errors
    /// Returns [`CacheError::Close`] when the connection does not close
    /// cleanly and [`CacheError::Poisoned`] after a panic while it was held.
    pub fn close(self) -> Result<(), CacheError> {
        self.connection
            .into_inner()
            .map_err(|_| CacheError::Poisoned)?
            .close()
            .map_err(|(_, source)| CacheError::Close(source))
    }

    /// The clock used to stamp and expire entries.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.connection.lock().map_err(|_| CacheError::Poisoned)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Timestamp in milliseconds before which rows have expired.
    pub(crate) fn expiry_cutoff(&self) -> i64 {
        let cutoff = self.now() - TimeDelta::days(CACHE_TTL_DAYS);
        cutoff.timestamp_millis()
    }

    /// Delete expired entries, returning how many were removed.
    ///
    /// # Errors
    /// Returns [`CacheError::Query`] when the delete fails.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let cutoff = self.expiry_cutoff();
        let purged = self
            .connection()?
            .execute("DELETE FROM geocode_cache WHERE created_at < ?1", [cutoff])
            .map_err(query_error("purge expired geocode entries"))?;
        if purged > 0 {
            log::debug!("purged {purged} expired geocode entries");
        }
        Ok(purged)
    }

    /// Return the newest unexpired entry for `key`.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the database cannot be queried or the
    /// stored place does not decode.
    pub fn lookup(&self, key: &CacheKey) -> Result<Option<Place>, CacheError> {
        self.purge_expired()?;
        let (address, lat_e6, lng_e6) = key_columns(key);
        let stored: Option<String> = self
            .connection()?
            .prepare_cached(SELECT_PLACE_SQL)
            .map_err(query_error("prepare geocode lookup"))?
            .query_row((address, lat_e6, lng_e6), |row| row.get(0))
            .optional()
            .map_err(query_error("look up geocode entry"))?;
        stored
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(CacheError::Codec)
    }

    /// Insert `place` under `key`, stamped with the current time.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the place cannot be encoded or inserted.
    pub fn store(&self, key: &CacheKey, place: &Place) -> Result<(), CacheError> {
        let json = serde_json::to_string(place).map_err(CacheError::Codec)?;
        let (address, lat_e6, lng_e6) = key_columns(key);
        let created_at = self.now().timestamp_millis();
        self.connection()?
            .prepare_cached(INSERT_PLACE_SQL)
            .map_err(query_error("prepare geocode insert"))?
            .execute((address, lat_e6, lng_e6, json, created_at))
            .map_err(query_error("insert geocode entry"))?;
        Ok(())
    }
}

fn key_columns(key: &CacheKey) -> (Option<&str>, Option<i64>, Option<i64>) {
    match key {
        CacheKey::Address(address) => (Some(address.as_str()), None, None),
        CacheKey::Coordinates { .. } => {
            let (lat, lng) = key.micro_degrees().unzip();
            (None, lat, lng)
        }
    }
}
