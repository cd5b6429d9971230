pub mod offline_handler;
pub mod submission_handler;

pub use offline_handler::OfflineHandler;
pub use submission_handler::SubmissionHandler;
