use super::Validate;
use crate::domain::entities::{
    EvidenceUpload, LineItem, LineItemInput, Submission, SubmissionValues,
};
use crate::domain::value_objects::{Commodity, display_amount};
use crate::shared::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub quantity: String,
    pub price: String,
    pub subtotal: String,
}

impl TryFrom<&LineItem> for LineItemResponse {
    type Error = AppError;

    fn try_from(item: &LineItem) -> Result<Self, Self::Error> {
        Ok(Self {
            quantity: item.quantity.normalize().to_string(),
            price: display_amount(item.price),
            subtotal: display_amount(item.subtotal()?),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub supervisor_id: String,
    pub supervisor_name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub sugar: LineItemResponse,
    pub salt: LineItemResponse,
    pub grand_total: String,
    pub status: String,
    pub remarks: String,
    pub admin_remarks: String,
    pub evidence_photos: Vec<String>,
    pub location: Option<String>,
    pub action_required_by: Option<String>,
    pub version: i64,
}

impl TryFrom<Submission> for SubmissionResponse {
    type Error = AppError;

    fn try_from(submission: Submission) -> Result<Self, Self::Error> {
        Ok(Self {
            sugar: submission.items.get(Commodity::Sugar).try_into()?,
            salt: submission.items.get(Commodity::Salt).try_into()?,
            grand_total: display_amount(submission.total()?),
            status: submission.status.as_str().to_string(),
            action_required_by: submission
                .action_required_by()
                .map(|role| role.as_str().to_string()),
            created_at: submission.created_at.timestamp_millis(),
            updated_at: submission.updated_at.timestamp_millis(),
            id: submission.id.to_string(),
            supervisor_id: submission.supervisor_id,
            supervisor_name: submission.supervisor_name,
            remarks: submission.remarks,
            admin_remarks: submission.admin_remarks,
            evidence_photos: submission
                .evidence
                .into_iter()
                .map(String::from)
                .collect(),
            location: submission.location,
            version: submission.version,
        })
    }
}

/// Raw form fields. Numbers stay as text until the lifecycle manager parses
/// them, so a rejected form can be shown back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFormDto {
    pub sugar_qty: String,
    pub sugar_price: String,
    pub salt_qty: String,
    pub salt_price: String,
}

impl SubmissionFormDto {
    pub fn to_values(&self) -> SubmissionValues {
        SubmissionValues::new(
            LineItemInput::new(self.sugar_qty.trim(), self.sugar_price.trim()),
            LineItemInput::new(self.salt_qty.trim(), self.salt_price.trim()),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    #[serde(flatten)]
    pub form: SubmissionFormDto,
    #[serde(default)]
    pub evidence: Vec<EvidenceUpload>,
    pub location: Option<String>,
}

impl Validate for CreateSubmissionRequest {
    fn validate(&self) -> Result<(), String> {
        if self.evidence.iter().any(|photo| photo.bytes.is_empty()) {
            return Err("Evidence photos must not be empty".to_string());
        }
        Ok(())
    }
}

/// Either created directly or parked in the offline queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CreateSubmissionResponse {
    Submitted { submission: SubmissionResponse },
    #[serde(rename_all = "camelCase")]
    Queued { entry_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSubmissionRequest {
    pub submission_id: String,
    pub decision: String,
    pub remark: Option<String>,
}

impl Validate for ValidateSubmissionRequest {
    fn validate(&self) -> Result<(), String> {
        if self.submission_id.trim().is_empty() {
            return Err("Submission id is required".to_string());
        }
        if self.decision.trim().is_empty() {
            return Err("Decision is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResubmitSubmissionRequest {
    pub submission_id: String,
    #[serde(flatten)]
    pub form: SubmissionFormDto,
    #[serde(default)]
    pub evidence: Vec<EvidenceUpload>,
}

impl Validate for ResubmitSubmissionRequest {
    fn validate(&self) -> Result<(), String> {
        if self.submission_id.trim().is_empty() {
            return Err("Submission id is required".to_string());
        }
        if self.evidence.iter().any(|photo| photo.bytes.is_empty()) {
            return Err("Evidence photos must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateSubmissionRequest {
    pub submission_id: String,
    pub admin_remark: String,
}

impl Validate for AnnotateSubmissionRequest {
    fn validate(&self) -> Result<(), String> {
        if self.submission_id.trim().is_empty() {
            return Err("Submission id is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsRequest {
    pub status: Option<String>,
}
