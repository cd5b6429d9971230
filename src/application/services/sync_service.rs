use super::offline_queue_service::OfflineQueueService;
use super::submission_service::SubmissionLifecycle;
use crate::application::ports::Connectivity;
use crate::domain::entities::DrainSummary;
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    Reconnected,
    Manual,
    Startup,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub pending_items: u32,
    pub last_sync: Option<i64>,
    pub last_summary: Option<DrainSummary>,
    pub sync_errors: u32,
}

/// Replays queued drafts into the lifecycle manager. At most one pass runs
/// at a time; triggers that land during a pass are folded into a single
/// follow-up pass.
pub struct SyncService {
    queue: Arc<OfflineQueueService>,
    lifecycle: Arc<dyn SubmissionLifecycle>,
    drain_lock: Mutex<()>,
    rerun_requested: AtomicBool,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncService {
    pub fn new(queue: Arc<OfflineQueueService>, lifecycle: Arc<dyn SubmissionLifecycle>) -> Self {
        Self {
            queue,
            lifecycle,
            drain_lock: Mutex::new(()),
            rerun_requested: AtomicBool::new(false),
            status: Arc::new(RwLock::new(SyncStatus::default())),
        }
    }

    /// Waits for any running pass, then drains the current queue snapshot.
    pub async fn drain_all(&self) -> Result<DrainSummary, AppError> {
        let _guard = self.drain_lock.lock().await;
        self.run_passes().await
    }

    /// Non-blocking entry point for background triggers. Returns `None`
    /// when another pass was already running; that pass will rerun once.
    pub async fn trigger(&self, trigger: SyncTrigger) -> Option<DrainSummary> {
        let _guard = match self.drain_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!(?trigger, "Drain in progress; coalescing trigger");
                self.rerun_requested.store(true, Ordering::SeqCst);
                return None;
            }
        };

        debug!(?trigger, "Sync triggered");
        match self.run_passes().await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!("Sync error: {}", e);
                self.status.write().await.sync_errors += 1;
                None
            }
        }
    }

    pub async fn get_status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    pub async fn refresh_pending(&self) -> Result<u32, AppError> {
        let pending = self.queue.pending_count().await? as u32;
        self.status.write().await.pending_items = pending;
        Ok(pending)
    }

    /// Starts a task that drains on every offline → online transition.
    pub fn spawn_connectivity_watcher(
        self: &Arc<Self>,
        connectivity: Arc<dyn Connectivity>,
    ) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let mut rx = connectivity.subscribe();
        let mut was_online = *rx.borrow_and_update();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                if online && !was_online {
                    info!("Connectivity regained; draining offline queue");
                    service.trigger(SyncTrigger::Reconnected).await;
                }
                was_online = online;
            }
            debug!("Connectivity watcher stopped");
        })
    }

    // Caller must hold `drain_lock`.
    async fn run_passes(&self) -> Result<DrainSummary, AppError> {
        self.status.write().await.is_syncing = true;
        self.rerun_requested.store(false, Ordering::SeqCst);

        let result = async {
            let mut summary = self.drain_once().await?;
            if self.rerun_requested.swap(false, Ordering::SeqCst) {
                debug!("Running coalesced follow-up drain");
                summary.merge(self.drain_once().await?);
            }
            Ok::<_, AppError>(summary)
        }
        .await;

        let pending = self.queue.pending_count().await.unwrap_or_default() as u32;
        let mut status = self.status.write().await;
        status.is_syncing = false;
        status.pending_items = pending;
        if let Ok(summary) = &result {
            status.last_sync = Some(chrono::Utc::now().timestamp());
            status.last_summary = Some(summary.clone());
        }
        result
    }

    async fn drain_once(&self) -> Result<DrainSummary, AppError> {
        let entries = self.queue.list().await?;
        let mut summary = DrainSummary::default();

        for entry in entries {
            match self.lifecycle.create(entry.draft).await {
                Ok(submission) => {
                    // A failed removal leaves the entry queued; the next pass
                    // would create a duplicate, which is accepted.
                    if let Err(e) = self.queue.remove(&entry.id).await {
                        warn!(entry_id = %entry.id, "Delivered entry could not be dequeued: {}", e);
                    }
                    info!(
                        entry_id = %entry.id,
                        submission_id = %submission.id,
                        "Offline entry delivered"
                    );
                    summary.record_success(entry.id, submission.id);
                }
                Err(e) => {
                    warn!(entry_id = %entry.id, code = e.code(), "Offline entry not delivered: {}", e);
                    summary.record_failure(entry.id, e.code(), e.to_string());
                }
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Drain pass finished"
        );
        Ok(summary)
    }
}
