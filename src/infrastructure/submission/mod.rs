mod rows;
pub mod sqlite_submission_store;

pub use sqlite_submission_store::SqliteSubmissionStore;
