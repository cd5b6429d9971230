use crate::application::services::{OfflineQueueService, SyncService};
use crate::domain::entities::Actor;
use crate::domain::value_objects::{OfflineEntryId, Permission};
use crate::presentation::dto::offline_dto::{
    DrainSummaryResponse, OfflineEntryResponse, SyncStatusResponse,
};
use crate::shared::AppError;
use std::sync::Arc;

/// Device-local queue operations. The queue belongs to the device, so only a
/// manual sync is role-gated; reconnect drains run without an actor.
pub struct OfflineHandler {
    queue: Arc<OfflineQueueService>,
    sync: Arc<SyncService>,
}

impl OfflineHandler {
    pub fn new(queue: Arc<OfflineQueueService>, sync: Arc<SyncService>) -> Self {
        Self { queue, sync }
    }

    pub async fn list_entries(&self) -> Result<Vec<OfflineEntryResponse>, AppError> {
        let entries = self.queue.list().await?;
        Ok(entries.iter().map(OfflineEntryResponse::from).collect())
    }

    pub async fn pending_count(&self) -> Result<usize, AppError> {
        self.queue.pending_count().await
    }

    pub async fn remove_entry(&self, entry_id: &str) -> Result<(), AppError> {
        let id = entry_id
            .trim()
            .parse::<OfflineEntryId>()
            .map_err(AppError::ValidationError)?;
        self.queue.remove(&id).await?;
        self.sync.refresh_pending().await?;
        Ok(())
    }

    pub async fn clear_queue(&self) -> Result<usize, AppError> {
        let removed = self.queue.clear().await?;
        self.sync.refresh_pending().await?;
        Ok(removed)
    }

    pub async fn sync_now(&self, actor: &Actor) -> Result<DrainSummaryResponse, AppError> {
        actor.require(Permission::SyncOfflineQueue)?;
        let summary = self.sync.drain_all().await?;
        let pending = self.queue.pending_count().await?;
        Ok(DrainSummaryResponse::new(summary, pending))
    }

    pub async fn get_sync_status(&self) -> Result<SyncStatusResponse, AppError> {
        Ok(self.sync.get_status().await.into())
    }
}
