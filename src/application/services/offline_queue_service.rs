use crate::application::ports::LocalStore;
use crate::domain::entities::{OfflineQueueEntry, SubmissionDraft};
use crate::domain::value_objects::OfflineEntryId;
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const MAX_ID_ATTEMPTS: usize = 8;

/// Durable FIFO of submission drafts kept on the device.
pub struct OfflineQueueService {
    store: Arc<dyn LocalStore>,
    write_lock: Mutex<()>,
}

impl OfflineQueueService {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Persists the draft and returns the stored entry. Draft contents are
    /// not validated here; that happens when the entry is replayed.
    pub async fn enqueue(&self, draft: SubmissionDraft) -> Result<OfflineQueueEntry, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut attempts = 0;
        let id = loop {
            let candidate = OfflineEntryId::generate();
            if self.store.get(candidate.as_str()).await?.is_none() {
                break candidate;
            }
            attempts += 1;
            if attempts >= MAX_ID_ATTEMPTS {
                return Err(AppError::Internal(
                    "Could not allocate a unique offline entry id".to_string(),
                ));
            }
        };

        let entry = OfflineQueueEntry {
            id,
            draft,
            enqueued_at: Utc::now(),
        };
        let payload = serde_json::to_string(&entry)?;
        self.store.put(entry.id.as_str(), &payload).await?;

        debug!(entry_id = %entry.id, "Draft queued for later upload");
        Ok(entry)
    }

    /// Entries in enqueue order. Unreadable payloads are skipped.
    pub async fn list(&self) -> Result<Vec<OfflineQueueEntry>, AppError> {
        let values = self.store.list_values().await?;
        let mut entries: Vec<OfflineQueueEntry> = values
            .iter()
            .filter_map(|raw| match serde_json::from_str::<OfflineQueueEntry>(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable offline entry: {}", e);
                    None
                }
            })
            .collect();
        // Stable: entries enqueued within the same instant keep storage order.
        entries.sort_by_key(|entry| entry.enqueued_at);
        Ok(entries)
    }

    /// Removing an id that is not queued is a no-op.
    pub async fn remove(&self, id: &OfflineEntryId) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.store.delete(id.as_str()).await?;
        debug!(entry_id = %id, "Offline entry removed");
        Ok(())
    }

    pub async fn pending_count(&self) -> Result<usize, AppError> {
        Ok(self.list().await?.len())
    }

    pub async fn clear(&self) -> Result<usize, AppError> {
        let entries = self.list().await?;
        let _guard = self.write_lock.lock().await;
        for entry in &entries {
            self.store.delete(entry.id.as_str()).await?;
        }
        Ok(entries.len())
    }
}
