use crate::application::ports::EvidenceStorage;
use crate::domain::value_objects::EvidenceUrl;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

const EVIDENCE_FOLDER: &str = "evidence";

/// Writes evidence blobs under `<root>/evidence/` and addresses them as
/// `<public_base_url>/evidence/<name>`.
#[derive(Debug, Clone)]
pub struct FileEvidenceStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FileEvidenceStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn path_for(&self, url: &EvidenceUrl) -> Result<PathBuf, AppError> {
        let prefix = format!("{}/{EVIDENCE_FOLDER}/", self.public_base_url);
        match url.as_str().strip_prefix(&prefix) {
            Some(name) if !name.is_empty() && !name.contains(['/', '\\']) && name != ".." => {
                Ok(self.root.join(EVIDENCE_FOLDER).join(name))
            }
            _ => Err(AppError::validation(format!(
                "{url} is not evidence held by this storage"
            ))),
        }
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
        .as_str()
    {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "image/gif" => "gif",
        _ => "bin",
    }
}

#[async_trait]
impl EvidenceStorage for FileEvidenceStorage {
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<EvidenceUrl, AppError> {
        let folder = self.root.join(EVIDENCE_FOLDER);
        tokio::fs::create_dir_all(&folder).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        tokio::fs::write(folder.join(&file_name), bytes).await?;

        debug!(file = %file_name, size = bytes.len(), "Stored evidence");

        EvidenceUrl::new(format!(
            "{}/{EVIDENCE_FOLDER}/{file_name}",
            self.public_base_url
        ))
        .map_err(AppError::Internal)
    }

    async fn remove(&self, url: &EvidenceUrl) -> Result<(), AppError> {
        let path = self.path_for(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(url = %url, "Removed evidence");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
