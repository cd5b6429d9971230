use crate::application::ports::{Connectivity, LocalStore};
use crate::application::services::{
    OfflineQueueService, StatsService, SubmissionLifecycle, SubmissionService, SyncService,
    SyncTrigger,
};
use crate::domain::entities::Actor;
use crate::infrastructure::offline::{OFFLINE_SUBMISSIONS_NAMESPACE, SESSION_NAMESPACE};
use crate::infrastructure::{
    ConnectionPool, ConnectivityMonitor, FileEvidenceStorage, SqliteLocalStore,
    SqliteSubmissionStore,
};
use crate::presentation::handlers::{OfflineHandler, SubmissionHandler};
use crate::shared::{AppConfig, AppError};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

const CURRENT_ACTOR_KEY: &str = "current_actor";

/// Process-wide wiring. Built once by [`AppState::initialize`] and torn
/// down with [`AppState::shutdown`].
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub lifecycle: Arc<dyn SubmissionLifecycle>,
    pub offline_queue: Arc<OfflineQueueService>,
    pub sync_service: Arc<SyncService>,
    pub stats_service: Arc<StatsService>,
    pub submission_handler: Arc<SubmissionHandler>,
    pub offline_handler: Arc<OfflineHandler>,
    session_store: Arc<dyn LocalStore>,
    session: Arc<RwLock<Option<Actor>>>,
    watcher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    pub async fn initialize(config: AppConfig) -> Result<Self, AppError> {
        Self::initialize_with(config, Arc::new(ConnectivityMonitor::new(true))).await
    }

    pub async fn initialize_with(
        config: AppConfig,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;
        tokio::fs::create_dir_all(&config.storage.data_dir).await?;

        let pool =
            ConnectionPool::new(&config.database.url, config.database.max_connections).await?;
        pool.migrate().await?;

        let submission_store = Arc::new(SqliteSubmissionStore::new(pool.clone()));
        let evidence_storage = Arc::new(FileEvidenceStorage::new(
            &config.storage.evidence_dir,
            config.storage.public_base_url.clone(),
        ));
        let lifecycle: Arc<dyn SubmissionLifecycle> = Arc::new(
            SubmissionService::new(submission_store, evidence_storage)
                .with_max_evidence(config.submissions.max_evidence),
        );

        let queue_store = Arc::new(SqliteLocalStore::new(
            pool.clone(),
            OFFLINE_SUBMISSIONS_NAMESPACE,
        ));
        let offline_queue = Arc::new(OfflineQueueService::new(queue_store));
        let sync_service = Arc::new(SyncService::new(
            Arc::clone(&offline_queue),
            Arc::clone(&lifecycle),
        ));
        let stats_service = Arc::new(StatsService::new(Arc::clone(&lifecycle)));

        let submission_handler = Arc::new(SubmissionHandler::new(
            Arc::clone(&lifecycle),
            Arc::clone(&offline_queue),
            Arc::clone(&stats_service),
            connectivity.clone(),
        ));
        let offline_handler = Arc::new(OfflineHandler::new(
            Arc::clone(&offline_queue),
            Arc::clone(&sync_service),
        ));

        let session_store: Arc<dyn LocalStore> =
            Arc::new(SqliteLocalStore::new(pool.clone(), SESSION_NAMESPACE));
        let session = restore_session(session_store.as_ref()).await;

        let watcher = if config.sync.sync_on_reconnect {
            Some(sync_service.spawn_connectivity_watcher(connectivity.clone()))
        } else {
            None
        };

        sync_service.refresh_pending().await?;
        if config.sync.auto_sync && connectivity.is_online() {
            let sync = Arc::clone(&sync_service);
            tokio::spawn(async move {
                sync.trigger(SyncTrigger::Startup).await;
            });
        }

        info!("Application state initialized");

        Ok(Self {
            config,
            pool,
            connectivity,
            lifecycle,
            offline_queue,
            sync_service,
            stats_service,
            submission_handler,
            offline_handler,
            session_store,
            session: Arc::new(RwLock::new(session)),
            watcher: Arc::new(Mutex::new(watcher)),
        })
    }

    pub async fn sign_in(&self, actor: Actor) -> Result<(), AppError> {
        let payload = serde_json::to_string(&actor)?;
        self.session_store.put(CURRENT_ACTOR_KEY, &payload).await?;
        info!(actor_id = %actor.id, role = %actor.role, "Signed in");
        *self.session.write().await = Some(actor);
        Ok(())
    }

    /// Queued drafts stay on the device; they are still undelivered data.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        self.session_store.delete(CURRENT_ACTOR_KEY).await?;
        *self.session.write().await = None;
        info!("Signed out");
        Ok(())
    }

    pub async fn current_actor(&self) -> Result<Actor, AppError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Unauthorized("No user is signed in".to_string()))
    }

    pub async fn shutdown(&self) {
        if let Some(handle) = self.watcher.lock().await.take() {
            handle.abort();
        }
        self.pool.close().await;
        info!("Application state shut down");
    }
}

async fn restore_session(store: &dyn LocalStore) -> Option<Actor> {
    match store.get(CURRENT_ACTOR_KEY).await {
        Ok(Some(raw)) => match serde_json::from_str::<Actor>(&raw) {
            Ok(actor) => Some(actor),
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to restore session: {}", e);
            None
        }
    }
}
