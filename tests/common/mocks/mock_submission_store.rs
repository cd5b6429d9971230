use async_trait::async_trait;
use chrono::Utc;
use spsi_lib::application::ports::SubmissionStore;
use spsi_lib::domain::entities::{
    NewSubmissionRecord, Submission, SubmissionFilter, SubmissionPatch,
};
use spsi_lib::domain::value_objects::SubmissionId;
use spsi_lib::shared::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory persistence collaborator with switchable network faults.
#[derive(Clone, Default)]
pub struct MockSubmissionStore {
    submissions: Arc<RwLock<Vec<Submission>>>,
    unreachable: Arc<AtomicBool>,
    updates_failing: Arc<AtomicBool>,
    create_calls: Arc<AtomicUsize>,
    failing_create_calls: Arc<RwLock<HashSet<usize>>>,
}

impl MockSubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Makes `update_submission` fail with a network error while reads
    /// still succeed.
    pub fn set_updates_failing(&self, failing: bool) {
        self.updates_failing.store(failing, Ordering::SeqCst);
    }

    /// Fails the n-th `create_submission` call (0-based) with a network error.
    pub async fn fail_create_call(&self, index: usize) {
        self.failing_create_calls.write().await.insert(index);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub async fn all(&self) -> Vec<Submission> {
        self.submissions.read().await.clone()
    }

    fn check_reachable(&self) -> Result<(), AppError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(AppError::Network("backend unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SubmissionStore for MockSubmissionStore {
    async fn create_submission(&self, record: NewSubmissionRecord) -> Result<Submission, AppError> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if self.failing_create_calls.read().await.contains(&call) {
            return Err(AppError::Network(format!("simulated fault on call {call}")));
        }

        let submission = record.into_submission(SubmissionId::generate(), Utc::now());
        self.submissions.write().await.push(submission.clone());
        Ok(submission)
    }

    async fn update_submission(
        &self,
        id: &SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Submission, AppError> {
        self.check_reachable()?;
        if self.updates_failing.load(Ordering::SeqCst) {
            return Err(AppError::Network("update dropped".to_string()));
        }
        let mut submissions = self.submissions.write().await;
        let slot = submissions
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))?;
        if slot.version != patch.expected_version {
            return Err(AppError::Conflict(format!("Submission {id} changed")));
        }
        let updated = patch.apply(slot.clone(), Utc::now());
        *slot = updated.clone();
        Ok(updated)
    }

    async fn get_submission(&self, id: &SubmissionId) -> Result<Option<Submission>, AppError> {
        self.check_reachable()?;
        Ok(self
            .submissions
            .read()
            .await
            .iter()
            .find(|s| &s.id == id)
            .cloned())
    }

    async fn list_submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<Submission>, AppError> {
        self.check_reachable()?;
        // Insertion order; the lifecycle manager does the ordering.
        Ok(self
            .submissions
            .read()
            .await
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }
}
