use crate::domain::value_objects::EvidenceUrl;
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait EvidenceStorage: Send + Sync {
    /// Stores an opaque blob and returns a URL any later viewer can resolve.
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<EvidenceUrl, AppError>;

    /// Deletes a blob returned by `store`. Removing a missing blob succeeds.
    async fn remove(&self, url: &EvidenceUrl) -> Result<(), AppError>;
}
