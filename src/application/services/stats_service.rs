use super::submission_service::SubmissionLifecycle;
use crate::domain::entities::{MonthlySales, StatusCounts, SubmissionFilter, SubmissionStats};
use crate::domain::value_objects::SubmissionStatus;
use crate::shared::error::AppError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Dashboard aggregates over every submission.
pub struct StatsService {
    lifecycle: Arc<dyn SubmissionLifecycle>,
}

impl StatsService {
    pub fn new(lifecycle: Arc<dyn SubmissionLifecycle>) -> Self {
        Self { lifecycle }
    }

    pub async fn summary(&self) -> Result<SubmissionStats, AppError> {
        let submissions = self.lifecycle.list(SubmissionFilter::all()).await?;

        let mut status_counts = StatusCounts::default();
        let mut by_month: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
        let mut approved_total = Decimal::ZERO;

        for submission in &submissions {
            status_counts.increment(submission.status);
            if submission.status == SubmissionStatus::Approved {
                let total = submission.total()?;
                approved_total = add_sales(approved_total, total)?;
                let key = (submission.created_at.year(), submission.created_at.month());
                let month = by_month.entry(key).or_insert(Decimal::ZERO);
                *month = add_sales(*month, total)?;
            }
        }

        let monthly_sales = by_month
            .into_iter()
            .map(|((year, month), sales)| MonthlySales {
                year,
                month,
                label: month_label(year, month),
                sales,
            })
            .collect();

        Ok(SubmissionStats {
            pending_tasks: status_counts.pending,
            status_counts,
            approved_total,
            monthly_sales,
        })
    }
}

fn add_sales(acc: Decimal, amount: Decimal) -> Result<Decimal, AppError> {
    acc.checked_add(amount)
        .ok_or_else(|| AppError::Internal("Approved sales total overflowed".to_string()))
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        EvidenceUpload, LineItem, LineItems, NewSubmissionRecord, Submission, SubmissionDraft,
        SubmissionValues,
    };
    use crate::domain::value_objects::{ReviewDecision, SubmissionId};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct FixedLifecycle(Vec<Submission>);

    #[async_trait]
    impl SubmissionLifecycle for FixedLifecycle {
        async fn create(&self, _: SubmissionDraft) -> Result<Submission, AppError> {
            unimplemented!()
        }
        async fn validate(
            &self,
            _: &SubmissionId,
            _: ReviewDecision,
            _: Option<String>,
        ) -> Result<Submission, AppError> {
            unimplemented!()
        }
        async fn resubmit(
            &self,
            _: &SubmissionId,
            _: SubmissionValues,
            _: Vec<EvidenceUpload>,
        ) -> Result<Submission, AppError> {
            unimplemented!()
        }
        async fn annotate(&self, _: &SubmissionId, _: String) -> Result<Submission, AppError> {
            unimplemented!()
        }
        async fn get(&self, _: &SubmissionId) -> Result<Submission, AppError> {
            unimplemented!()
        }
        async fn list(&self, _: SubmissionFilter) -> Result<Vec<Submission>, AppError> {
            Ok(self.0.clone())
        }
    }

    fn submission(month: u32, total: i64, status: SubmissionStatus) -> Submission {
        submission_worth(month, Decimal::from(total), status)
    }

    fn submission_worth(month: u32, total: Decimal, status: SubmissionStatus) -> Submission {
        let items = LineItems::new(
            LineItem::new(total, Decimal::ONE).unwrap(),
            LineItem::new(Decimal::ZERO, Decimal::ZERO).unwrap(),
        )
        .unwrap();
        let created_at = Utc.with_ymd_and_hms(2025, month, 3, 9, 0, 0).unwrap();
        let mut submission = NewSubmissionRecord {
            supervisor_id: "sup-1".into(),
            supervisor_name: "Supervisor One".into(),
            items,
            evidence: vec![],
            location: None,
        }
        .into_submission(SubmissionId::generate(), created_at);
        submission.status = status;
        submission
    }

    #[tokio::test]
    async fn groups_approved_sales_by_month() {
        let service = StatsService::new(Arc::new(FixedLifecycle(vec![
            submission(3, 40, SubmissionStatus::Approved),
            submission(1, 10, SubmissionStatus::Approved),
            submission(1, 5, SubmissionStatus::Approved),
            submission(1, 99, SubmissionStatus::Rejected),
            submission(2, 7, SubmissionStatus::Pending),
        ])));

        let stats = service.summary().await.unwrap();

        assert_eq!(stats.pending_tasks, 1);
        assert_eq!(stats.status_counts.approved, 3);
        assert_eq!(stats.status_counts.rejected, 1);
        assert_eq!(stats.approved_total, Decimal::from(55));
        let labels: Vec<_> = stats.monthly_sales.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 2025", "Mar 2025"]);
        assert_eq!(stats.monthly_sales[0].sales, Decimal::from(15));
    }

    #[tokio::test]
    async fn oversized_sales_total_is_an_error() {
        let service = StatsService::new(Arc::new(FixedLifecycle(vec![
            submission_worth(1, Decimal::MAX, SubmissionStatus::Approved),
            submission_worth(2, Decimal::MAX, SubmissionStatus::Approved),
        ])));

        let err = service.summary().await.unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }
}
