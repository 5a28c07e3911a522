//! Publishing the conditions record to the key-value cache.
//!
//! Downstream readers fetch a single well-known key, [`CONDITIONS_KEY`].
//! Every run overwrites it in full with no expiry, so the cache only ever
//! holds the latest document.

use crate::errors::ConditionsError;
use crate::models::ConditionsRecord;
use crate::outputs::json;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use std::fmt;
use tracing::{info, instrument};

/// Cache key holding the latest conditions document.
pub const CONDITIONS_KEY: &str = "latest-conditions";

/// A key-value store that can hold the published document.
pub trait ConditionsStore {
    /// Store `value` under `key`, replacing any previous value, with no expiry.
    async fn set(&self, key: &str, value: String) -> Result<(), ConditionsError>;
}

/// Redis-backed [`ConditionsStore`].
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Parse `url` and open a connection.
    ///
    /// An unparseable URL is a configuration error; failing to reach the
    /// server is a cache error.
    #[instrument(level = "info", skip_all)]
    pub async fn connect(url: &str) -> Result<Self, ConditionsError> {
        let client = redis::Client::open(url)
            .map_err(|e| ConditionsError::Config(format!("invalid cache URL: {e}")))?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Connected to cache");
        Ok(Self { conn })
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl ConditionsStore for RedisStore {
    async fn set(&self, key: &str, value: String) -> Result<(), ConditionsError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }
}

/// Serialize `record` and write it under [`CONDITIONS_KEY`].
///
/// The previous document is replaced in full; nothing from it is merged.
///
/// # Arguments
///
/// * `record` - The fully assembled conditions record
/// * `store` - The cache to write to
///
/// # Returns
///
/// `Ok(())` once the document is stored, or an error if serialization or
/// the cache write fails.
#[instrument(level = "info", skip_all, fields(key = CONDITIONS_KEY, entries = record.data.len()))]
pub async fn publish<C>(record: &ConditionsRecord, store: &C) -> Result<(), ConditionsError>
where
    C: ConditionsStore,
{
    let body = json::to_json(record)?;
    let bytes = body.len();
    store.set(CONDITIONS_KEY, body).await?;
    info!(bytes, "Published conditions record");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;
    use crate::models::WeatherObservation;
    use crate::registry::fixture_metadata;

    fn record_for(title: &str) -> ConditionsRecord {
        let mut obs: WeatherObservation =
            serde_json::from_value(serde_json::json!({"timezone": "America/Vancouver"})).unwrap();
        obs.overlay(&fixture_metadata(title));
        ConditionsRecord::new(vec![obs])
    }

    #[tokio::test]
    async fn test_publish_writes_fixed_key() {
        let store = MemoryStore::default();
        let record = record_for("Hill A");
        publish(&record, &store).await.unwrap();

        let stored: ConditionsRecord =
            serde_json::from_str(&store.get(CONDITIONS_KEY).unwrap()).unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_publish_overwrites_previous_document() {
        let store = MemoryStore::default();
        publish(&record_for("Old Title"), &store).await.unwrap();
        publish(&record_for("New Title"), &store).await.unwrap();

        let raw = store.get(CONDITIONS_KEY).unwrap();
        assert!(!raw.contains("Old Title"));
        let stored: ConditionsRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.data.len(), 1);
        assert_eq!(stored.data[0].title, "New Title");
    }

    #[tokio::test]
    async fn test_publish_write_failure() {
        let store = MemoryStore::failing();
        assert!(matches!(
            publish(&record_for("Hill A"), &store).await,
            Err(ConditionsError::Cache(_))
        ));
        assert!(store.get(CONDITIONS_KEY).is_none());
    }

    #[tokio::test]
    async fn test_connect_unreachable_server() {
        assert!(matches!(
            RedisStore::connect("redis://127.0.0.1:1").await,
            Err(ConditionsError::Cache(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        assert!(matches!(
            RedisStore::connect("definitely not a url").await,
            Err(ConditionsError::Config(_))
        ));
    }
}
