use crate::domain::entities::{LineItem, LineItems, Submission};
use crate::domain::value_objects::{EvidenceUrl, SubmissionId, SubmissionStatus};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;

/// `grand_total` is stored for reporting only and is not read back; the
/// entity recomputes its total from the line items.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: String,
    pub supervisor_id: String,
    pub supervisor_name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub sugar_qty: String,
    pub sugar_price: String,
    pub salt_qty: String,
    pub salt_price: String,
    pub status: String,
    pub remarks: String,
    pub admin_remarks: String,
    pub evidence_photos: String,
    pub location: Option<String>,
    pub version: i64,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = AppError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let items = LineItems {
            sugar: LineItem {
                quantity: decimal_column("sugar_qty", &row.sugar_qty)?,
                price: decimal_column("sugar_price", &row.sugar_price)?,
            },
            salt: LineItem {
                quantity: decimal_column("salt_qty", &row.salt_qty)?,
                price: decimal_column("salt_price", &row.salt_price)?,
            },
        };

        let evidence_raw: Vec<String> = serde_json::from_str(&row.evidence_photos)?;
        let evidence = evidence_raw
            .into_iter()
            .map(EvidenceUrl::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Database)?;

        Ok(Submission {
            id: SubmissionId::new(row.id).map_err(AppError::Database)?,
            supervisor_id: row.supervisor_id,
            supervisor_name: row.supervisor_name,
            created_at: timestamp_column("created_at", row.created_at)?,
            updated_at: timestamp_column("updated_at", row.updated_at)?,
            items,
            status: SubmissionStatus::from_str(&row.status).map_err(AppError::Database)?,
            remarks: row.remarks,
            admin_remarks: row.admin_remarks,
            evidence,
            location: row.location,
            version: row.version,
        })
    }
}

fn decimal_column(column: &str, raw: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(raw)
        .map_err(|err| AppError::Database(format!("Invalid decimal in {column}: {err}")))
}

fn timestamp_column(column: &str, millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp in {column}: {millis}")))
}

pub fn evidence_column(evidence: &[EvidenceUrl]) -> Result<String, AppError> {
    let raw: Vec<&str> = evidence.iter().map(EvidenceUrl::as_str).collect();
    Ok(serde_json::to_string(&raw)?)
}
