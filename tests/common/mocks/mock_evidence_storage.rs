use async_trait::async_trait;
use spsi_lib::application::ports::EvidenceStorage;
use spsi_lib::domain::value_objects::EvidenceUrl;
use spsi_lib::shared::AppError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MockEvidenceStorage {
    stored: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    unavailable: Arc<AtomicBool>,
    store_calls: Arc<AtomicUsize>,
    failing_store_calls: Arc<RwLock<HashSet<usize>>>,
}

impl MockEvidenceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Fails the n-th `store` call (0-based) with a storage error.
    pub async fn fail_store_call(&self, index: usize) {
        self.failing_store_calls.write().await.insert(index);
    }

    /// Blobs currently held, i.e. stored and not removed.
    pub async fn stored_count(&self) -> usize {
        self.stored.read().await.len()
    }
}

#[async_trait]
impl EvidenceStorage for MockEvidenceStorage {
    async fn store(&self, bytes: &[u8], _content_type: &str) -> Result<EvidenceUrl, AppError> {
        let call = self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Storage("evidence storage unavailable".to_string()));
        }
        if self.failing_store_calls.read().await.contains(&call) {
            return Err(AppError::Storage(format!("simulated fault on upload {call}")));
        }
        let url = format!("mock://evidence/{call}");
        self.stored.write().await.insert(url.clone(), bytes.to_vec());
        EvidenceUrl::new(url).map_err(AppError::Internal)
    }

    async fn remove(&self, url: &EvidenceUrl) -> Result<(), AppError> {
        self.stored.write().await.remove(url.as_str());
        Ok(())
    }
}
