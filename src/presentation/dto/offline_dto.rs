use crate::application::services::SyncStatus;
use crate::domain::entities::{DrainSummary, OfflineQueueEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineEntryResponse {
    pub entry_id: String,
    pub supervisor_id: String,
    pub enqueued_at: i64,
    pub evidence_count: usize,
    pub location: Option<String>,
}

impl From<&OfflineQueueEntry> for OfflineEntryResponse {
    fn from(entry: &OfflineQueueEntry) -> Self {
        Self {
            entry_id: entry.id.to_string(),
            supervisor_id: entry.draft.supervisor_id.clone(),
            enqueued_at: entry.enqueued_at.timestamp_millis(),
            evidence_count: entry.draft.evidence.len(),
            location: entry.draft.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainFailureResponse {
    pub entry_id: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainSummaryResponse {
    pub succeeded: u32,
    pub failed: u32,
    pub failed_ids: Vec<String>,
    pub failures: Vec<DrainFailureResponse>,
    pub created_submission_ids: Vec<String>,
    pub pending_count: usize,
}

impl DrainSummaryResponse {
    pub fn new(summary: DrainSummary, pending_count: usize) -> Self {
        Self {
            succeeded: summary.succeeded,
            failed: summary.failed,
            created_submission_ids: summary
                .created_ids()
                .into_iter()
                .map(String::from)
                .collect(),
            failed_ids: summary.failed_ids.iter().map(|id| id.to_string()).collect(),
            failures: summary
                .failures
                .into_iter()
                .map(|failure| DrainFailureResponse {
                    entry_id: failure.entry_id.to_string(),
                    code: failure.code,
                    message: failure.message,
                })
                .collect(),
            pending_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    pub is_syncing: bool,
    pub pending_items: u32,
    pub last_sync: Option<i64>,
    pub sync_errors: u32,
}

impl From<SyncStatus> for SyncStatusResponse {
    fn from(status: SyncStatus) -> Self {
        Self {
            is_syncing: status.is_syncing,
            pending_items: status.pending_items,
            last_sync: status.last_sync,
            sync_errors: status.sync_errors,
        }
    }
}
