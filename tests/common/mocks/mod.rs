pub mod mock_connectivity;
pub mod mock_evidence_storage;
pub mod mock_local_store;
pub mod mock_submission_store;

pub use mock_connectivity::*;
pub use mock_evidence_storage::*;
pub use mock_local_store::*;
pub use mock_submission_store::*;
