use crate::application::ports::{EvidenceStorage, SubmissionStore};
use crate::domain::entities::{
    EvidenceUpload, NewSubmissionRecord, Submission, SubmissionDraft, SubmissionFilter,
    SubmissionPatch, SubmissionValues,
};
use crate::domain::value_objects::{EvidenceUrl, ReviewDecision, SubmissionId, SubmissionStatus};
use crate::shared::error::AppError;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_MAX_EVIDENCE: usize = 10;

/// Submission state machine: `Pending → Approved | Rejected`,
/// `Rejected → Pending` on resubmission. Admin annotation is allowed from
/// any status and never changes it.
#[async_trait]
pub trait SubmissionLifecycle: Send + Sync {
    async fn create(&self, draft: SubmissionDraft) -> Result<Submission, AppError>;

    async fn validate(
        &self,
        id: &SubmissionId,
        decision: ReviewDecision,
        remark: Option<String>,
    ) -> Result<Submission, AppError>;

    async fn resubmit(
        &self,
        id: &SubmissionId,
        values: SubmissionValues,
        new_evidence: Vec<EvidenceUpload>,
    ) -> Result<Submission, AppError>;

    async fn annotate(&self, id: &SubmissionId, admin_remark: String)
    -> Result<Submission, AppError>;

    async fn get(&self, id: &SubmissionId) -> Result<Submission, AppError>;

    /// Most recently created first.
    async fn list(&self, filter: SubmissionFilter) -> Result<Vec<Submission>, AppError>;
}

pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
    evidence: Arc<dyn EvidenceStorage>,
    max_evidence: usize,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn SubmissionStore>, evidence: Arc<dyn EvidenceStorage>) -> Self {
        Self {
            store,
            evidence,
            max_evidence: DEFAULT_MAX_EVIDENCE,
        }
    }

    pub fn with_max_evidence(mut self, max_evidence: usize) -> Self {
        self.max_evidence = max_evidence;
        self
    }

    async fn require(&self, id: &SubmissionId) -> Result<Submission, AppError> {
        self.store
            .get_submission(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))
    }

    fn check_evidence_cap(&self, existing: usize, added: usize) -> Result<(), AppError> {
        if existing + added > self.max_evidence {
            return Err(AppError::validation(format!(
                "A submission can carry at most {} photos ({} attached, {} new)",
                self.max_evidence, existing, added
            )));
        }
        Ok(())
    }

    /// Uploads in parallel; the returned URLs keep the upload order. If any
    /// upload fails, the ones that succeeded are discarded.
    async fn upload(&self, uploads: &[EvidenceUpload]) -> Result<Vec<EvidenceUrl>, AppError> {
        let results = join_all(
            uploads
                .iter()
                .map(|upload| self.evidence.store(&upload.bytes, &upload.content_type)),
        )
        .await;

        let mut stored = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(url) => stored.push(url),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            None => Ok(stored),
            Some(e) => {
                self.discard(&stored).await;
                Err(e)
            }
        }
    }

    /// Best-effort removal of evidence that no stored submission references.
    async fn discard(&self, urls: &[EvidenceUrl]) {
        for url in urls {
            if let Err(e) = self.evidence.remove(url).await {
                warn!(url = %url, error = %e, "Failed to remove orphaned evidence");
            }
        }
    }
}

fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl SubmissionLifecycle for SubmissionService {
    async fn create(&self, draft: SubmissionDraft) -> Result<Submission, AppError> {
        let supervisor_id = required_text(&draft.supervisor_id, "Supervisor id")?;
        let supervisor_name = required_text(&draft.supervisor_name, "Supervisor name")?;
        let items = draft.values.parse()?;
        let total = items.total()?;
        self.check_evidence_cap(0, draft.evidence.len())?;

        let evidence = self.upload(&draft.evidence).await?;

        let created = self
            .store
            .create_submission(NewSubmissionRecord {
                supervisor_id,
                supervisor_name,
                items,
                evidence: evidence.clone(),
                location: draft.location.filter(|loc| !loc.trim().is_empty()),
            })
            .await;
        let submission = match created {
            Ok(submission) => submission,
            Err(e) => {
                self.discard(&evidence).await;
                return Err(e);
            }
        };

        info!(
            submission_id = %submission.id,
            supervisor_id = %submission.supervisor_id,
            total = %total,
            "Submission created"
        );
        Ok(submission)
    }

    async fn validate(
        &self,
        id: &SubmissionId,
        decision: ReviewDecision,
        remark: Option<String>,
    ) -> Result<Submission, AppError> {
        let current = self.require(id).await?;
        if current.status != SubmissionStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "Submission {id} is {} and cannot be validated",
                current.status
            )));
        }

        let remark = remark
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        if decision == ReviewDecision::Rejected && remark.is_none() {
            return Err(AppError::validation(
                "A rejection requires a non-empty remark",
            ));
        }

        let mut patch = SubmissionPatch::new(current.version).with_status(decision.target_status());
        if let Some(remark) = remark {
            patch = patch.with_remarks(remark);
        }

        let updated = self.store.update_submission(id, patch).await?;
        info!(submission_id = %id, status = %updated.status, "Submission validated");
        Ok(updated)
    }

    async fn resubmit(
        &self,
        id: &SubmissionId,
        values: SubmissionValues,
        new_evidence: Vec<EvidenceUpload>,
    ) -> Result<Submission, AppError> {
        let current = self.require(id).await?;
        if current.status != SubmissionStatus::Rejected {
            return Err(AppError::InvalidTransition(format!(
                "Submission {id} is {}; only rejected submissions can be resubmitted",
                current.status
            )));
        }

        let items = values.parse()?;
        let total = items.total()?;
        self.check_evidence_cap(current.evidence.len(), new_evidence.len())?;
        let appended = self.upload(&new_evidence).await?;

        // Remarks stay as the record of the previous review.
        let patch = SubmissionPatch::new(current.version)
            .with_items(items)
            .with_appended_evidence(appended.clone())
            .with_status(SubmissionStatus::Pending);

        let updated = match self.store.update_submission(id, patch).await {
            Ok(updated) => updated,
            Err(e) => {
                self.discard(&appended).await;
                return Err(e);
            }
        };
        info!(
            submission_id = %id,
            total = %total,
            evidence = updated.evidence.len(),
            "Submission resubmitted"
        );
        Ok(updated)
    }

    async fn annotate(
        &self,
        id: &SubmissionId,
        admin_remark: String,
    ) -> Result<Submission, AppError> {
        let current = self.require(id).await?;
        let patch = SubmissionPatch::new(current.version)
            .with_admin_remarks(admin_remark.trim().to_string());

        let updated = self.store.update_submission(id, patch).await?;
        info!(submission_id = %id, "Admin remark recorded");
        Ok(updated)
    }

    async fn get(&self, id: &SubmissionId) -> Result<Submission, AppError> {
        self.require(id).await
    }

    async fn list(&self, filter: SubmissionFilter) -> Result<Vec<Submission>, AppError> {
        let mut submissions = self.store.list_submissions(&filter).await?;
        // Stable sort keeps the store's tie-break for identical timestamps.
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }
}
