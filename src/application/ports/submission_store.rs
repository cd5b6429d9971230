use crate::domain::entities::{NewSubmissionRecord, Submission, SubmissionFilter, SubmissionPatch};
use crate::domain::value_objects::SubmissionId;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Backend that owns the submission table. Identifiers and timestamps are
/// assigned here, never by the caller.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn create_submission(&self, record: NewSubmissionRecord)
    -> Result<Submission, AppError>;

    /// Fails with `Conflict` when the stored version differs from
    /// `patch.expected_version`, and `NotFound` when the record is missing.
    async fn update_submission(
        &self,
        id: &SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Submission, AppError>;

    async fn get_submission(&self, id: &SubmissionId) -> Result<Option<Submission>, AppError>;

    async fn list_submissions(&self, filter: &SubmissionFilter)
    -> Result<Vec<Submission>, AppError>;
}
