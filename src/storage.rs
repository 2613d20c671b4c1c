use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Executor, Pool, Row, Sqlite};
use tokio::sync::Mutex;

use crate::{entities::SavedRoute, error::Error};

/// Single fixed namespace key holding the saved-route list.
pub const SAVED_ROUTES_KEY: &str = "urban_mobi_saved_routes";

/// Durable, device-local key/value storage.
#[async_trait]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

pub type DynKeyValueStore = Arc<dyn KeyValueStore + Send + Sync>;

pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    #[tracing::instrument(name = "SqliteStore::new")]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(db_uri)
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)")
            .await?;

        Ok(Self { pool })
    }

    /// A private database living as long as the store. Mostly for tests.
    pub async fn in_memory() -> Result<Self, Error> {
        Self::new("sqlite::memory:", 1).await
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let maybe_row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match maybe_row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        sqlx::query("INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Persistence adapter for the saved-route list. Every write replaces the
/// whole entry.
#[derive(Clone)]
pub struct RouteStore {
    kv: DynKeyValueStore,
}

impl RouteStore {
    pub fn new(kv: DynKeyValueStore) -> Self {
        Self { kv }
    }

    /// Missing, unreadable or unparseable entries all load as an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn load_saved_routes(&self) -> Vec<SavedRoute> {
        let raw = match self.kv.get(SAVED_ROUTES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(err) => {
                tracing::warn!("failed to read saved routes: {}", err);
                return vec![];
            }
        };

        match serde_json::from_str(&raw) {
            Ok(routes) => routes,
            Err(err) => {
                tracing::warn!("failed to parse saved routes: {}", err);
                vec![]
            }
        }
    }

    #[tracing::instrument(skip(self, routes), fields(count = routes.len()))]
    pub async fn store_saved_routes(&self, routes: &[SavedRoute]) -> Result<(), Error> {
        let raw = serde_json::to_string(routes)?;
        self.kv.set(SAVED_ROUTES_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GeocodedResult, Location};

    fn route(id: &str, name: &str) -> SavedRoute {
        let stop = GeocodedResult {
            display_name: "Estação da Luz, São Paulo".into(),
            lat: -23.5347,
            lon: -46.6353,
        };
        let origin = Location {
            lat: -23.55,
            lng: -46.63,
            name: "Starting Point".into(),
        };

        SavedRoute::from_sequence(id.into(), name.into(), origin, &[stop], "08:00".into())
            .unwrap()
    }

    #[tokio::test]
    async fn empty_store_loads_nothing() {
        let store = RouteStore::new(Arc::new(SqliteStore::in_memory().await.unwrap()));
        assert!(store.load_saved_routes().await.is_empty());
    }

    #[tokio::test]
    async fn writes_replace_the_whole_list() {
        let store = RouteStore::new(Arc::new(SqliteStore::in_memory().await.unwrap()));

        let first = vec![route("2", "Gym"), route("1", "Office")];
        store.store_saved_routes(&first).await.unwrap();
        assert_eq!(store.load_saved_routes().await, first);

        let second = vec![route("1", "Office")];
        store.store_saved_routes(&second).await.unwrap();
        assert_eq!(store.load_saved_routes().await, second);
    }

    #[tokio::test]
    async fn corrupt_entry_loads_as_empty() {
        let kv = Arc::new(MemoryStore::default());
        kv.set(SAVED_ROUTES_KEY, "{not json").await.unwrap();

        let store = RouteStore::new(kv);
        assert!(store.load_saved_routes().await.is_empty());
    }

    #[tokio::test]
    async fn entry_uses_the_fixed_key() {
        let kv = Arc::new(MemoryStore::default());
        let store = RouteStore::new(kv.clone());

        store.store_saved_routes(&[route("1", "Office")]).await.unwrap();

        let raw = kv.get(SAVED_ROUTES_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["name"], "Office");
        assert_eq!(value[0]["time"], "08:00");
        assert_eq!(value[0]["isActive"], true);
    }
}
