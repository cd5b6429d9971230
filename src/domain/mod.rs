pub mod entities;
pub mod value_objects;

pub use entities::{OfflineQueueEntry, Submission, SubmissionDraft};
pub use value_objects::{OfflineEntryId, Role, SubmissionId, SubmissionStatus};
