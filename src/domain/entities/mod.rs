pub mod actor;
pub mod evidence;
pub mod offline;
pub mod stats;
pub mod submission;

pub use actor::Actor;
pub use evidence::EvidenceUpload;
pub use offline::{
    AcknowledgedEntry, DrainFailure, DrainSummary, OfflineQueueEntry, SubmissionDraft,
};
pub use stats::{MonthlySales, StatusCounts, SubmissionStats};
pub use submission::{
    LineItem, LineItemInput, LineItems, NewSubmissionRecord, Submission, SubmissionFilter,
    SubmissionPatch, SubmissionValues,
};
