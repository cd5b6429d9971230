pub mod connectivity;
pub mod evidence_storage;
pub mod local_store;
pub mod submission_store;

pub use connectivity::Connectivity;
pub use evidence_storage::EvidenceStorage;
pub use local_store::LocalStore;
pub use submission_store::SubmissionStore;
