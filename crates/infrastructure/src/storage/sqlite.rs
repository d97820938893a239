use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use waystation_application::ports::{CacheStorage, CacheStore};
use waystation_domain::{CachedResponse, DomainError, RequestIdentity};

type EntryRow = (i64, String, Vec<u8>);

fn store_error(op: &'static str, store: &str, e: sqlx::Error) -> DomainError {
    error!(error = %e, store, op, "Cache store query failed");
    DomainError::CacheUnavailable(format!("{op} on store '{store}': {e}"))
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A named store persisted in SQLite. Survives restarts.
pub struct SqliteCacheStore {
    pool: SqlitePool,
    name: Arc<str>,
}

impl SqliteCacheStore {
    fn row_to_response(&self, row: EntryRow) -> Result<CachedResponse, DomainError> {
        let (status, headers, body) = row;
        let headers: Vec<(String, String)> = serde_json::from_str(&headers).map_err(|e| {
            DomainError::DatabaseError(format!(
                "corrupt headers in store '{}': {e}",
                self.name
            ))
        })?;
        let status = u16::try_from(status).map_err(|_| {
            DomainError::DatabaseError(format!("invalid status {status} in store '{}'", self.name))
        })?;
        Ok(CachedResponse::new(status, headers, body))
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(store = %self.name))]
    async fn get(&self, identity: &RequestIdentity) -> Result<Option<CachedResponse>, DomainError> {
        let row = sqlx::query_as::<_, EntryRow>(
            "SELECT status, headers, body FROM cache_entries
             WHERE store_name = ? AND identity = ?",
        )
        .bind(&*self.name)
        .bind(identity.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("get", &self.name, e))?;

        row.map(|r| self.row_to_response(r)).transpose()
    }

    #[instrument(skip(self, response), fields(store = %self.name, status = response.status))]
    async fn put(
        &self,
        identity: &RequestIdentity,
        response: CachedResponse,
    ) -> Result<(), DomainError> {
        let headers = serde_json::to_string(&*response.headers)
            .map_err(|e| DomainError::DatabaseError(format!("failed to encode headers: {e}")))?;

        sqlx::query(
            "INSERT OR REPLACE INTO cache_entries (store_name, identity, status, headers, body, stored_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&*self.name)
        .bind(identity.as_str())
        .bind(i64::from(response.status))
        .bind(headers)
        .bind(response.body.as_ref())
        .bind(now())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("put", &self.name, e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(store = %self.name))]
    async fn delete(&self, identity: &RequestIdentity) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE store_name = ? AND identity = ?")
            .bind(&*self.name)
            .bind(identity.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete", &self.name, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn keys(&self) -> Result<Vec<RequestIdentity>, DomainError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT identity FROM cache_entries WHERE store_name = ? ORDER BY seq ASC",
        )
        .bind(&*self.name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("keys", &self.name, e))?;

        Ok(rows
            .into_iter()
            .map(|(identity,)| RequestIdentity::from(identity.as_str()))
            .collect())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let (count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM cache_entries WHERE store_name = ?",
        )
        .bind(&*self.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("len", &self.name, e))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}

pub struct SqliteCacheStorage {
    pool: SqlitePool,
}

impl SqliteCacheStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStorage for SqliteCacheStorage {
    #[instrument(skip(self))]
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, DomainError> {
        let result = sqlx::query("INSERT OR IGNORE INTO cache_stores (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(now())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("open", name, e))?;

        if result.rows_affected() > 0 {
            debug!(store = name, "Created store");
        }

        let store: Arc<dyn CacheStore> = Arc::new(SqliteCacheStore {
            pool: self.pool.clone(),
            name: Arc::from(name),
        });
        Ok(store)
    }

    #[instrument(skip(self))]
    async fn delete_store(&self, name: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM cache_stores WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete_store", name, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn store_names(&self) -> Result<Vec<String>, DomainError> {
        let rows = sqlx::query_as::<_, (String,)>("SELECT name FROM cache_stores ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("store_names", "*", e))?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
