// Whole-object persistence for the cache and coverage state.
// Each blob is read and replaced as a unit, there is no incremental append.

use chrono::{NaiveDateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

use crate::cache::TweetCache;
use crate::error::{Error, Result};
use crate::model::CoverageState;
use crate::schema::state_blob;

pub trait BlobStore {
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>>;
    fn save(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = state_blob)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct NewBlob<'a> {
    name: &'a str,
    content: &'a [u8],
    updated_date: NaiveDateTime,
}

/// Create the blob table if it does not exist yet.
pub fn init(conn: &mut SqliteConnection) -> Result<()> {
    conn.batch_execute(
        "CREATE TABLE IF NOT EXISTS state_blob (
            name TEXT PRIMARY KEY NOT NULL,
            content BLOB NOT NULL,
            updated_date TIMESTAMP NOT NULL
        );",
    )?;
    Ok(())
}

impl BlobStore for SqliteConnection {
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = state_blob::table
            .find(key)
            .select(state_blob::content)
            .first::<Vec<u8>>(self)
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let new_blob = NewBlob {
            name: key,
            content: value,
            updated_date: Utc::now().naive_utc(),
        };
        diesel::replace_into(state_blob::table).values(&new_blob).execute(self)?;
        Ok(())
    }
}

/// Blob keys of one tracked account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKeys {
    pub cache: String,
    pub coverage: String,
}

impl StateKeys {
    pub fn new(account_id: &str) -> Self {
        Self {
            cache: format!("{}/tweets_cache.json", account_id),
            coverage: format!("{}/coverage_state.json", account_id),
        }
    }
}

fn load_json<T: DeserializeOwned>(store: &mut impl BlobStore, key: &str) -> Result<Option<T>> {
    let Some(bytes) = store.load(key)? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes).map(Some).map_err(|e| Error::CorruptState {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn save_json<T: Serialize>(store: &mut impl BlobStore, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    store.save(key, &bytes)
}

/// Load the cache, failing with [`Error::CorruptState`] when the blob is not an ordered sequence.
pub fn load_cache(store: &mut impl BlobStore, key: &str) -> Result<TweetCache> {
    let cache: TweetCache = load_json(store, key)?.unwrap_or_default();
    if !cache.is_ordered() {
        return Err(Error::CorruptState {
            key: key.to_string(),
            reason: "records are not ordered by time".to_string(),
        });
    }
    Ok(cache)
}

/// Load the coverage state, failing with [`Error::CorruptState`] when the bounds are inconsistent.
pub fn load_coverage(store: &mut impl BlobStore, key: &str) -> Result<CoverageState> {
    let coverage: CoverageState = load_json(store, key)?.unwrap_or_default();
    if !coverage.is_valid() {
        return Err(Error::CorruptState {
            key: key.to_string(),
            reason: format!("invalid bounds {:?}..{:?}", coverage.earliest_time, coverage.latest_time),
        });
    }
    Ok(coverage)
}

/// Load both blobs of an account. If either is corrupt, both are discarded so the coverage never
/// describes records the cache does not hold.
pub fn load_state(store: &mut impl BlobStore, keys: &StateKeys) -> Result<(TweetCache, CoverageState)> {
    let cache = load_cache(store, &keys.cache);
    let coverage = load_coverage(store, &keys.coverage);
    match (cache, coverage) {
        (Ok(cache), Ok(coverage)) => Ok((cache, coverage)),
        (Err(Error::CorruptState { key, reason }), _) | (_, Err(Error::CorruptState { key, reason })) => {
            tracing::warn!("Discarding corrupt state `{}`: {}. Falling back to a full backfill", key, reason);
            Ok((TweetCache::new(), CoverageState::default()))
        }
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}

pub fn save_cache(store: &mut impl BlobStore, key: &str, cache: &TweetCache) -> Result<()> {
    save_json(store, key, cache)
}

pub fn save_coverage(store: &mut impl BlobStore, key: &str, coverage: &CoverageState) -> Result<()> {
    save_json(store, key, coverage)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::TweetRecord;

    fn memory_store() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        init(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_blob_replace() {
        let mut store = memory_store();
        assert_eq!(store.load("a").unwrap(), None);
        store.save("a", b"one").unwrap();
        store.save("a", b"two").unwrap();
        store.save("b", b"three").unwrap();
        assert_eq!(store.load("a").unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.load("b").unwrap(), Some(b"three".to_vec()));
    }

    #[test]
    fn test_missing_state_loads_empty() {
        let mut store = memory_store();
        let keys = StateKeys::new("someone");
        assert!(load_cache(&mut store, &keys.cache).unwrap().is_empty());
        assert!(load_coverage(&mut store, &keys.coverage).unwrap().is_initial());
    }

    #[test]
    fn test_corrupt_state_is_reported() {
        let mut store = memory_store();
        let keys = StateKeys::new("someone");
        store.save(&keys.cache, b"{not json").unwrap();
        store
            .save(
                &keys.coverage,
                br#"{"earliestTime":"2024-01-02T00:00:00Z","latestTime":"2024-01-01T00:00:00Z"}"#,
            )
            .unwrap();

        assert!(matches!(load_cache(&mut store, &keys.cache), Err(Error::CorruptState { .. })));
        assert!(matches!(
            load_coverage(&mut store, &keys.coverage),
            Err(Error::CorruptState { .. })
        ));
    }

    #[test]
    fn test_load_state_discards_both_blobs() {
        let mut store = memory_store();
        let keys = StateKeys::new("someone");
        let coverage = CoverageState {
            earliest_time: Some(Utc::now() - chrono::Duration::hours(2)),
            latest_time: Some(Utc::now()),
            ..Default::default()
        };
        save_coverage(&mut store, &keys.coverage, &coverage).unwrap();
        store.save(&keys.cache, b"42").unwrap();

        let (cache, coverage) = load_state(&mut store, &keys).unwrap();
        assert!(cache.is_empty());
        assert!(coverage.is_initial());
    }

    #[test]
    fn test_unordered_cache_is_corrupt() {
        let mut store = memory_store();
        let records = [
            TweetRecord {
                id: "1".to_string(),
                text: String::new(),
                ticker: "A".to_string(),
                timestamp: 1,
            },
            TweetRecord {
                id: "2".to_string(),
                text: String::new(),
                ticker: "A".to_string(),
                timestamp: 2,
            },
        ];
        store.save("cache", &serde_json::to_vec(&records).unwrap()).unwrap();
        assert!(matches!(load_cache(&mut store, "cache"), Err(Error::CorruptState { .. })));
    }

    #[test]
    fn test_state_round_trip() {
        let mut store = memory_store();
        let keys = StateKeys::new("someone");
        let coverage = CoverageState {
            earliest_time: Some(Utc::now() - chrono::Duration::hours(2)),
            latest_time: Some(Utc::now()),
            earliest_id: Some("10".to_string()),
            latest_id: Some("20".to_string()),
        };
        save_coverage(&mut store, &keys.coverage, &coverage).unwrap();
        assert_eq!(load_coverage(&mut store, &keys.coverage).unwrap(), coverage);
    }
}
