pub mod offline_queue_service;
pub mod stats_service;
pub mod submission_service;
pub mod sync_service;

pub use offline_queue_service::OfflineQueueService;
pub use stats_service::StatsService;
pub use submission_service::{DEFAULT_MAX_EVIDENCE, SubmissionLifecycle, SubmissionService};
pub use sync_service::{SyncService, SyncStatus, SyncTrigger};
