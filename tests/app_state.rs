mod common;

use common::photo;
use spsi_lib::domain::entities::Actor;
use spsi_lib::domain::value_objects::Role;
use spsi_lib::infrastructure::ConnectivityMonitor;
use spsi_lib::presentation::dto::submission_dto::{
    AnnotateSubmissionRequest, CreateSubmissionRequest, CreateSubmissionResponse,
    ListSubmissionsRequest, ResubmitSubmissionRequest, SubmissionFormDto,
    ValidateSubmissionRequest,
};
use spsi_lib::{AppConfig, AppError, AppState};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn test_config(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default().with_data_dir(dir.path().join("device"));
    config.sync.auto_sync = false;
    config
}

fn form(sugar_qty: &str, sugar_price: &str, salt_qty: &str, salt_price: &str) -> SubmissionFormDto {
    SubmissionFormDto {
        sugar_qty: sugar_qty.into(),
        sugar_price: sugar_price.into(),
        salt_qty: salt_qty.into(),
        salt_price: salt_price.into(),
    }
}

fn supervisor() -> Actor {
    Actor::new("sup-1", "Supervisor One", Role::Supervisor)
}

fn validator() -> Actor {
    Actor::new("val-1", "Validator One", Role::Validator)
}

fn admin() -> Actor {
    Actor::new("adm-1", "Admin One", Role::Admin)
}

#[tokio::test]
async fn session_survives_restart_and_sign_out_keeps_queue() {
    let dir = TempDir::new().unwrap();
    let connectivity = Arc::new(ConnectivityMonitor::new(false));

    let state = AppState::initialize_with(test_config(&dir), connectivity.clone())
        .await
        .unwrap();
    assert!(matches!(
        state.current_actor().await,
        Err(AppError::Unauthorized(_))
    ));
    state.sign_in(supervisor()).await.unwrap();
    let queued = state
        .submission_handler
        .create_submission(
            &supervisor(),
            CreateSubmissionRequest {
                form: form("1", "1", "1", "1"),
                evidence: vec![],
                location: None,
            },
        )
        .await
        .unwrap();
    assert!(matches!(queued, CreateSubmissionResponse::Queued { .. }));
    state.shutdown().await;

    let restored = AppState::initialize_with(test_config(&dir), connectivity)
        .await
        .unwrap();
    assert_eq!(restored.current_actor().await.unwrap(), supervisor());

    restored.sign_out().await.unwrap();
    assert!(restored.current_actor().await.is_err());
    assert_eq!(restored.offline_queue.pending_count().await.unwrap(), 1);
    restored.shutdown().await;
}

#[tokio::test]
async fn manual_sync_requires_queue_permission() {
    let dir = TempDir::new().unwrap();
    let connectivity = Arc::new(ConnectivityMonitor::new(false));
    let state = AppState::initialize_with(test_config(&dir), connectivity)
        .await
        .unwrap();
    state
        .submission_handler
        .create_submission(
            &supervisor(),
            CreateSubmissionRequest {
                form: form("1", "1", "1", "1"),
                evidence: vec![],
                location: None,
            },
        )
        .await
        .unwrap();

    for outsider in [validator(), admin()] {
        let err = state.offline_handler.sync_now(&outsider).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)), "{err:?}");
    }
    assert_eq!(state.offline_handler.pending_count().await.unwrap(), 1);

    let summary = state.offline_handler.sync_now(&supervisor()).await.unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.pending_count, 0);
    state.shutdown().await;
}

#[tokio::test]
async fn offline_create_is_delivered_after_reconnect() {
    let dir = TempDir::new().unwrap();
    let connectivity = Arc::new(ConnectivityMonitor::new(false));
    let state = AppState::initialize_with(test_config(&dir), connectivity.clone())
        .await
        .unwrap();

    let response = state
        .submission_handler
        .create_submission(
            &supervisor(),
            CreateSubmissionRequest {
                form: form("10", "5", "4", "3"),
                evidence: vec![photo("shelf.jpg")],
                location: Some("Depot 7".into()),
            },
        )
        .await
        .unwrap();
    assert!(matches!(response, CreateSubmissionResponse::Queued { .. }));
    assert_eq!(state.offline_handler.pending_count().await.unwrap(), 1);

    connectivity.set_online(true);

    let mut delivered = false;
    for _ in 0..200 {
        if state.offline_queue.pending_count().await.unwrap() == 0 {
            delivered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(delivered, "reconnect did not drain the queue");

    let listed = state
        .submission_handler
        .list_submissions(&supervisor(), ListSubmissionsRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].grand_total, "62.00");
    assert_eq!(listed[0].location.as_deref(), Some("Depot 7"));
    assert_eq!(listed[0].evidence_photos.len(), 1);
    state.shutdown().await;
}

#[tokio::test]
async fn handlers_enforce_roles_through_the_review_cycle() {
    let dir = TempDir::new().unwrap();
    let state = AppState::initialize(test_config(&dir)).await.unwrap();
    let handler = &state.submission_handler;

    let created = match handler
        .create_submission(
            &supervisor(),
            CreateSubmissionRequest {
                form: form("10", "5", "4", "3"),
                evidence: vec![photo("a.jpg")],
                location: None,
            },
        )
        .await
        .unwrap()
    {
        CreateSubmissionResponse::Submitted { submission } => submission,
        other => panic!("expected direct submission, got {other:?}"),
    };
    assert_eq!(created.grand_total, "62.00");
    assert_eq!(created.action_required_by.as_deref(), Some("validator"));

    let err = handler
        .create_submission(
            &validator(),
            CreateSubmissionRequest {
                form: form("1", "1", "1", "1"),
                evidence: vec![],
                location: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = handler
        .validate_submission(
            &supervisor(),
            ValidateSubmissionRequest {
                submission_id: created.id.clone(),
                decision: "approved".into(),
                remark: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let rejected = handler
        .validate_submission(
            &validator(),
            ValidateSubmissionRequest {
                submission_id: created.id.clone(),
                decision: "rejected".into(),
                remark: Some("blurry photo".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, "Rejected");
    assert_eq!(rejected.action_required_by.as_deref(), Some("supervisor"));

    let other_supervisor = Actor::new("sup-2", "Supervisor Two", Role::Supervisor);
    let err = handler
        .resubmit_submission(
            &other_supervisor,
            ResubmitSubmissionRequest {
                submission_id: created.id.clone(),
                form: form("12", "5", "4", "3"),
                evidence: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let resubmitted = handler
        .resubmit_submission(
            &supervisor(),
            ResubmitSubmissionRequest {
                submission_id: created.id.clone(),
                form: form("12", "5", "4", "3"),
                evidence: vec![photo("b.jpg")],
            },
        )
        .await
        .unwrap();
    assert_eq!(resubmitted.status, "Pending");
    assert_eq!(resubmitted.grand_total, "72.00");
    assert_eq!(resubmitted.evidence_photos.len(), 2);

    let annotated = handler
        .annotate_submission(
            &admin(),
            AnnotateSubmissionRequest {
                submission_id: created.id.clone(),
                admin_remark: "spot-checked".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(annotated.status, "Pending");
    assert_eq!(annotated.admin_remarks, "spot-checked");

    let visible_to_other = handler
        .list_submissions(&other_supervisor, ListSubmissionsRequest::default())
        .await
        .unwrap();
    assert!(visible_to_other.is_empty());

    let pending_for_validator = handler
        .list_submissions(
            &validator(),
            ListSubmissionsRequest {
                status: Some("pending".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(pending_for_validator.len(), 1);

    let err = handler.get_stats(&admin()).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    let stats = handler
        .get_stats(&Actor::new("root", "Super Admin", Role::SuperAdmin))
        .await
        .unwrap();
    assert_eq!(stats.pending_tasks, 1);
    assert_eq!(stats.approved_total, "0.00");

    state.shutdown().await;
}
