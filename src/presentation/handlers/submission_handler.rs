use crate::application::ports::Connectivity;
use crate::application::services::{OfflineQueueService, StatsService, SubmissionLifecycle};
use crate::domain::entities::{Actor, Submission, SubmissionDraft, SubmissionFilter};
use crate::domain::value_objects::{
    Permission, ReviewDecision, Role, SubmissionId, SubmissionStatus,
};
use crate::presentation::dto::Validate;
use crate::presentation::dto::stats_dto::StatsResponse;
use crate::presentation::dto::submission_dto::{
    AnnotateSubmissionRequest, CreateSubmissionRequest, CreateSubmissionResponse,
    ListSubmissionsRequest, ResubmitSubmissionRequest, SubmissionResponse,
    ValidateSubmissionRequest,
};
use crate::shared::AppError;
use std::sync::Arc;

pub struct SubmissionHandler {
    lifecycle: Arc<dyn SubmissionLifecycle>,
    queue: Arc<OfflineQueueService>,
    stats: Arc<StatsService>,
    connectivity: Arc<dyn Connectivity>,
}

impl SubmissionHandler {
    pub fn new(
        lifecycle: Arc<dyn SubmissionLifecycle>,
        queue: Arc<OfflineQueueService>,
        stats: Arc<StatsService>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            lifecycle,
            queue,
            stats,
            connectivity,
        }
    }

    /// Creates directly while online, otherwise parks the draft in the
    /// offline queue. Errors from a direct attempt go back to the caller.
    pub async fn create_submission(
        &self,
        actor: &Actor,
        request: CreateSubmissionRequest,
    ) -> Result<CreateSubmissionResponse, AppError> {
        actor.require(Permission::CreateSubmission)?;
        request.validate().map_err(AppError::ValidationError)?;

        let draft = SubmissionDraft::new(&actor.id, &actor.name, request.form.to_values())
            .with_evidence(request.evidence)
            .with_location(request.location);

        if self.connectivity.is_online() {
            let submission = self.lifecycle.create(draft).await?;
            Ok(CreateSubmissionResponse::Submitted {
                submission: SubmissionResponse::try_from(submission)?,
            })
        } else {
            let entry = self.queue.enqueue(draft).await?;
            Ok(CreateSubmissionResponse::Queued {
                entry_id: entry.id.to_string(),
            })
        }
    }

    pub async fn validate_submission(
        &self,
        actor: &Actor,
        request: ValidateSubmissionRequest,
    ) -> Result<SubmissionResponse, AppError> {
        actor.require(Permission::ValidateSubmission)?;
        request.validate().map_err(AppError::ValidationError)?;

        let id = parse_submission_id(&request.submission_id)?;
        let decision = request
            .decision
            .parse::<ReviewDecision>()
            .map_err(AppError::ValidationError)?;

        let updated = self
            .lifecycle
            .validate(&id, decision, request.remark)
            .await?;
        SubmissionResponse::try_from(updated)
    }

    /// Supervisors may only resubmit their own rejected submissions.
    pub async fn resubmit_submission(
        &self,
        actor: &Actor,
        request: ResubmitSubmissionRequest,
    ) -> Result<SubmissionResponse, AppError> {
        actor.require(Permission::ResubmitSubmission)?;
        request.validate().map_err(AppError::ValidationError)?;

        let id = parse_submission_id(&request.submission_id)?;
        let current = self.lifecycle.get(&id).await?;
        ensure_visible(actor, &current)?;

        let updated = self
            .lifecycle
            .resubmit(&id, request.form.to_values(), request.evidence)
            .await?;
        SubmissionResponse::try_from(updated)
    }

    pub async fn annotate_submission(
        &self,
        actor: &Actor,
        request: AnnotateSubmissionRequest,
    ) -> Result<SubmissionResponse, AppError> {
        actor.require(Permission::AnnotateSubmission)?;
        request.validate().map_err(AppError::ValidationError)?;

        let id = parse_submission_id(&request.submission_id)?;
        let updated = self.lifecycle.annotate(&id, request.admin_remark).await?;
        SubmissionResponse::try_from(updated)
    }

    pub async fn get_submission(
        &self,
        actor: &Actor,
        submission_id: &str,
    ) -> Result<SubmissionResponse, AppError> {
        actor.require(Permission::ListOwnSubmissions)?;
        let id = parse_submission_id(submission_id)?;
        let submission = self.lifecycle.get(&id).await?;
        ensure_visible(actor, &submission)?;
        SubmissionResponse::try_from(submission)
    }

    pub async fn list_submissions(
        &self,
        actor: &Actor,
        request: ListSubmissionsRequest,
    ) -> Result<Vec<SubmissionResponse>, AppError> {
        let mut filter = scope_for(actor)?;
        if let Some(status) = request.status.as_deref() {
            let status = status
                .parse::<SubmissionStatus>()
                .map_err(AppError::ValidationError)?;
            filter = filter.with_status(status);
        }

        let submissions = self.lifecycle.list(filter).await?;
        submissions
            .into_iter()
            .map(SubmissionResponse::try_from)
            .collect()
    }

    pub async fn get_stats(&self, actor: &Actor) -> Result<StatsResponse, AppError> {
        actor.require(Permission::ViewStats)?;
        Ok(self.stats.summary().await?.into())
    }
}

fn scope_for(actor: &Actor) -> Result<SubmissionFilter, AppError> {
    match actor.role {
        Role::Supervisor => {
            actor.require(Permission::ListOwnSubmissions)?;
            Ok(SubmissionFilter::by_supervisor(&actor.id))
        }
        Role::Validator | Role::Admin | Role::SuperAdmin => {
            actor.require(Permission::ListAllSubmissions)?;
            Ok(SubmissionFilter::all())
        }
    }
}

fn ensure_visible(actor: &Actor, submission: &Submission) -> Result<(), AppError> {
    if actor.role.permits(Permission::ListAllSubmissions) || submission.supervisor_id == actor.id {
        Ok(())
    } else {
        Err(AppError::Unauthorized(format!(
            "Submission {} belongs to another supervisor",
            submission.id
        )))
    }
}

fn parse_submission_id(value: &str) -> Result<SubmissionId, AppError> {
    value
        .trim()
        .parse::<SubmissionId>()
        .map_err(AppError::ValidationError)
}
