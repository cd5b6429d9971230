use super::evidence::EvidenceUpload;
use super::submission::SubmissionValues;
use crate::domain::value_objects::{OfflineEntryId, SubmissionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to create a submission, captured on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub supervisor_id: String,
    pub supervisor_name: String,
    pub values: SubmissionValues,
    #[serde(default)]
    pub evidence: Vec<EvidenceUpload>,
    #[serde(default)]
    pub location: Option<String>,
}

impl SubmissionDraft {
    pub fn new(
        supervisor_id: impl Into<String>,
        supervisor_name: impl Into<String>,
        values: SubmissionValues,
    ) -> Self {
        Self {
            supervisor_id: supervisor_id.into(),
            supervisor_name: supervisor_name.into(),
            values,
            evidence: Vec::new(),
            location: None,
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<EvidenceUpload>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }
}

/// A draft stored on the device until the backend acknowledges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineQueueEntry {
    pub id: OfflineEntryId,
    pub draft: SubmissionDraft,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainFailure {
    pub entry_id: OfflineEntryId,
    pub code: String,
    pub message: String,
}

/// Result of one or more passes over the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainSummary {
    pub succeeded: u32,
    pub failed: u32,
    pub failed_ids: Vec<OfflineEntryId>,
    pub failures: Vec<DrainFailure>,
    pub acknowledged: Vec<AcknowledgedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgedEntry {
    pub entry_id: OfflineEntryId,
    pub submission_id: SubmissionId,
}

impl DrainSummary {
    pub fn record_success(&mut self, entry_id: OfflineEntryId, submission_id: SubmissionId) {
        self.succeeded += 1;
        self.acknowledged.push(AcknowledgedEntry {
            entry_id,
            submission_id,
        });
    }

    pub fn record_failure(&mut self, entry_id: OfflineEntryId, code: &str, message: String) {
        self.failed += 1;
        self.failed_ids.push(entry_id.clone());
        self.failures.push(DrainFailure {
            entry_id,
            code: code.to_string(),
            message,
        });
    }

    pub fn attempted(&self) -> u32 {
        self.succeeded + self.failed
    }

    pub fn created_ids(&self) -> Vec<SubmissionId> {
        self.acknowledged
            .iter()
            .map(|ack| ack.submission_id.clone())
            .collect()
    }

    /// Folds a follow-up pass into this summary. Failures are reported once,
    /// using the latest attempt for each entry.
    pub fn merge(&mut self, next: DrainSummary) {
        let retried: Vec<OfflineEntryId> = next
            .failed_ids
            .iter()
            .cloned()
            .chain(next.acknowledged.iter().map(|ack| ack.entry_id.clone()))
            .collect();
        self.failed_ids.retain(|id| !retried.contains(id));
        self.failures
            .retain(|failure| !retried.contains(&failure.entry_id));

        self.succeeded += next.succeeded;
        self.acknowledged.extend(next.acknowledged);
        self.failed_ids.extend(next.failed_ids);
        self.failures.extend(next.failures);
        self.failed = self.failed_ids.len() as u32;
    }
}
