pub mod database;
pub mod network;
pub mod offline;
pub mod storage;
pub mod submission;

pub use database::ConnectionPool;
pub use network::ConnectivityMonitor;
pub use offline::SqliteLocalStore;
pub use storage::FileEvidenceStorage;
pub use submission::SqliteSubmissionStore;
