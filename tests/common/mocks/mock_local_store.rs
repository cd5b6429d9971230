use async_trait::async_trait;
use spsi_lib::application::ports::LocalStore;
use spsi_lib::shared::AppError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Key/value store kept in insertion order.
#[derive(Clone, Default)]
pub struct MockLocalStore {
    entries: Arc<RwLock<Vec<(String, String)>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AppError::Storage("local store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LocalStore for MockLocalStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.check()?;
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.check()?;
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.check()?;
        self.entries.write().await.retain(|(k, _)| k != key);
        Ok(())
    }

    async fn list_values(&self) -> Result<Vec<String>, AppError> {
        self.check()?;
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|(_, v)| v.clone())
            .collect())
    }
}
