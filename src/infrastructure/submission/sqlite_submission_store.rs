use super::rows::{SubmissionRow, evidence_column};
use crate::application::ports::SubmissionStore;
use crate::domain::entities::{
    NewSubmissionRecord, Submission, SubmissionFilter, SubmissionPatch,
};
use crate::domain::value_objects::SubmissionId;
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

const SELECT_COLUMNS: &str = r#"
    SELECT id, supervisor_id, supervisor_name, created_at, updated_at,
           sugar_qty, sugar_price, salt_qty, salt_price,
           status, remarks, admin_remarks, evidence_photos, location, version
    FROM submissions
"#;

/// SQLite-backed stand-in for the hosted backend.
#[derive(Clone)]
pub struct SqliteSubmissionStore {
    pool: ConnectionPool,
}

impl SqliteSubmissionStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: &str) -> Result<Option<Submission>, AppError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        row.map(Submission::try_from).transpose()
    }

    async fn write(&self, submission: &Submission, expected_version: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE submissions
            SET sugar_qty = ?1, sugar_price = ?2, salt_qty = ?3, salt_price = ?4,
                grand_total = ?5, status = ?6, remarks = ?7, admin_remarks = ?8,
                evidence_photos = ?9, version = ?10, updated_at = ?11
            WHERE id = ?12 AND version = ?13
            "#,
        )
        .bind(submission.items.sugar.quantity.to_string())
        .bind(submission.items.sugar.price.to_string())
        .bind(submission.items.salt.quantity.to_string())
        .bind(submission.items.salt.price.to_string())
        .bind(submission.total()?.to_string())
        .bind(submission.status.as_str())
        .bind(&submission.remarks)
        .bind(&submission.admin_remarks)
        .bind(evidence_column(&submission.evidence)?)
        .bind(submission.version)
        .bind(submission.updated_at.timestamp_millis())
        .bind(submission.id.as_str())
        .bind(expected_version)
        .execute(self.pool.get_pool())
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SubmissionStore for SqliteSubmissionStore {
    async fn create_submission(
        &self,
        record: NewSubmissionRecord,
    ) -> Result<Submission, AppError> {
        let submission = record.into_submission(SubmissionId::generate(), Utc::now());
        let now_ms = submission.created_at.timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, supervisor_id, supervisor_name, created_at, updated_at,
                sugar_qty, sugar_price, salt_qty, salt_price, grand_total,
                status, remarks, admin_remarks, evidence_photos, location, version
            ) VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?7, ?8, ?9, ?10, '', '', ?11, ?12, ?13)
            "#,
        )
        .bind(submission.id.as_str())
        .bind(&submission.supervisor_id)
        .bind(&submission.supervisor_name)
        .bind(now_ms)
        .bind(submission.items.sugar.quantity.to_string())
        .bind(submission.items.sugar.price.to_string())
        .bind(submission.items.salt.quantity.to_string())
        .bind(submission.items.salt.price.to_string())
        .bind(submission.total()?.to_string())
        .bind(submission.status.as_str())
        .bind(evidence_column(&submission.evidence)?)
        .bind(&submission.location)
        .bind(submission.version)
        .execute(self.pool.get_pool())
        .await?;

        debug!(submission_id = %submission.id, "Inserted submission");

        self.fetch(submission.id.as_str())
            .await?
            .ok_or_else(|| AppError::Internal("Inserted submission vanished".to_string()))
    }

    async fn update_submission(
        &self,
        id: &SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Submission, AppError> {
        let current = self
            .fetch(id.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))?;

        let expected_version = patch.expected_version;
        if current.version != expected_version {
            return Err(AppError::Conflict(format!(
                "Submission {id} is at version {}, expected {expected_version}",
                current.version
            )));
        }

        let updated = patch.apply(current, Utc::now());
        if self.write(&updated, expected_version).await? == 0 {
            return Err(AppError::Conflict(format!(
                "Submission {id} changed while being updated"
            )));
        }

        debug!(submission_id = %id, version = updated.version, "Updated submission");

        self.fetch(id.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))
    }

    async fn get_submission(&self, id: &SubmissionId) -> Result<Option<Submission>, AppError> {
        self.fetch(id.as_str()).await
    }

    async fn list_submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<Submission>, AppError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        builder.push(" WHERE 1 = 1");
        if let Some(supervisor_id) = &filter.supervisor_id {
            builder.push(" AND supervisor_id = ");
            builder.push_bind(supervisor_id.clone());
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        builder.push(" ORDER BY created_at DESC, seq DESC");

        let rows = builder
            .build_query_as::<SubmissionRow>()
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(Submission::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LineItemInput, SubmissionValues};
    use crate::domain::value_objects::{EvidenceUrl, SubmissionStatus};
    use rust_decimal::Decimal;

    async fn setup_store() -> SqliteSubmissionStore {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        SqliteSubmissionStore::new(pool)
    }

    fn record(supervisor_id: &str) -> NewSubmissionRecord {
        let items = SubmissionValues::new(
            LineItemInput::new("10", "5"),
            LineItemInput::new("4", "3"),
        )
        .parse()
        .unwrap();
        NewSubmissionRecord {
            supervisor_id: supervisor_id.to_string(),
            supervisor_name: format!("Name of {supervisor_id}"),
            items,
            evidence: vec![EvidenceUrl::new("file:///e/1.jpg".into()).unwrap()],
            location: Some("Lat: 1, Long: 2".into()),
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_defaults() {
        let store = setup_store().await;

        let created = store.create_submission(record("sup-1")).await.unwrap();

        assert_eq!(created.status, SubmissionStatus::Pending);
        assert_eq!(created.version, 1);
        assert!(created.remarks.is_empty());
        assert!(created.admin_remarks.is_empty());
        assert_eq!(created.total().unwrap(), Decimal::from(62));
        assert_eq!(created.evidence.len(), 1);
        assert_eq!(created.location.as_deref(), Some("Lat: 1, Long: 2"));

        let fetched = store.get_submission(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_rejects_stale_version() {
        let store = setup_store().await;
        let created = store.create_submission(record("sup-1")).await.unwrap();

        let updated = store
            .update_submission(
                &created.id,
                SubmissionPatch::new(1).with_status(SubmissionStatus::Approved),
            )
            .await
            .unwrap();
        assert_eq!(updated.version, 2);

        let stale = store
            .update_submission(
                &created.id,
                SubmissionPatch::new(1).with_admin_remarks("late".into()),
            )
            .await
            .unwrap_err();
        assert!(matches!(stale, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = setup_store().await;
        let err = store
            .update_submission(&SubmissionId::generate(), SubmissionPatch::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let store = setup_store().await;
        let first = store.create_submission(record("sup-1")).await.unwrap();
        let second = store.create_submission(record("sup-2")).await.unwrap();
        let third = store.create_submission(record("sup-1")).await.unwrap();

        store
            .update_submission(
                &third.id,
                SubmissionPatch::new(1).with_status(SubmissionStatus::Rejected),
            )
            .await
            .unwrap();

        let all = store.list_submissions(&SubmissionFilter::all()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![third.id.clone(), second.id.clone(), first.id.clone()]);

        let own = store
            .list_submissions(&SubmissionFilter::by_supervisor("sup-1"))
            .await
            .unwrap();
        assert_eq!(own.len(), 2);

        let rejected = store
            .list_submissions(
                &SubmissionFilter::by_supervisor("sup-1").with_status(SubmissionStatus::Rejected),
            )
            .await
            .unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].id, third.id);
    }
}
