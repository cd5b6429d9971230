pub mod amount;
pub mod commodity;
pub mod evidence_url;
pub mod offline_entry_id;
pub mod role;
pub mod submission_id;
pub mod submission_status;

pub use amount::display_amount;
pub use commodity::Commodity;
pub use evidence_url::EvidenceUrl;
pub use offline_entry_id::OfflineEntryId;
pub use role::{Permission, Role};
pub use submission_id::SubmissionId;
pub use submission_status::{ReviewDecision, SubmissionStatus};
