use crate::application::ports::LocalStore;
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;

pub const OFFLINE_SUBMISSIONS_NAMESPACE: &str = "offline_submissions";
pub const SESSION_NAMESPACE: &str = "session";

/// Key/value store over the `local_kv` table. Each instance is scoped to one
/// namespace so that `list_values` only sees its own keys.
#[derive(Clone)]
pub struct SqliteLocalStore {
    pool: ConnectionPool,
    namespace: String,
}

impl SqliteLocalStore {
    pub fn new(pool: ConnectionPool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl LocalStore for SqliteLocalStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO local_kv (namespace, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(namespace, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(self.pool.get_pool())
        .await
        .map_err(storage_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM local_kv WHERE namespace = ?1 AND key = ?2")
                .bind(&self.namespace)
                .bind(key)
                .fetch_optional(self.pool.get_pool())
                .await
                .map_err(storage_error)?;
        Ok(row.map(|(value,)| value))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM local_kv WHERE namespace = ?1 AND key = ?2")
            .bind(&self.namespace)
            .bind(key)
            .execute(self.pool.get_pool())
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn list_values(&self) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT value FROM local_kv WHERE namespace = ?1 ORDER BY seq ASC")
                .bind(&self.namespace)
                .fetch_all(self.pool.get_pool())
                .await
                .map_err(storage_error)?;
        Ok(rows.into_iter().map(|(value,)| value).collect())
    }
}

// Every failure of the device store is a storage-medium fault to callers.
fn storage_error(err: sqlx::Error) -> AppError {
    AppError::Storage(err.to_string())
}
