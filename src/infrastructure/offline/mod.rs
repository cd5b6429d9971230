pub mod sqlite_local_store;

pub use sqlite_local_store::{OFFLINE_SUBMISSIONS_NAMESPACE, SESSION_NAMESPACE, SqliteLocalStore};
