use crate::shared::error::AppError;
use async_trait::async_trait;

/// Device-local key/value storage that survives restarts.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
    /// Values in the order their keys were first written.
    async fn list_values(&self) -> Result<Vec<String>, AppError>;
}
