use crate::domain::value_objects::{
    Commodity, EvidenceUrl, Role, SubmissionId, SubmissionStatus,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raw form text for one commodity, as typed by the supervisor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub quantity: String,
    pub price: String,
}

impl LineItemInput {
    pub fn new(quantity: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            quantity: quantity.into(),
            price: price.into(),
        }
    }
}

/// Form values for both commodities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionValues {
    pub sugar: LineItemInput,
    pub salt: LineItemInput,
}

impl SubmissionValues {
    pub fn new(sugar: LineItemInput, salt: LineItemInput) -> Self {
        Self { sugar, salt }
    }

    pub fn parse(&self) -> Result<LineItems, AppError> {
        LineItems::new(
            LineItem::parse(Commodity::Sugar, &self.sugar)?,
            LineItem::parse(Commodity::Salt, &self.salt)?,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: Decimal,
    pub price: Decimal,
}

impl LineItem {
    pub fn new(quantity: Decimal, price: Decimal) -> Result<Self, AppError> {
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(AppError::validation("Quantity must not be negative"));
        }
        if price.is_sign_negative() && !price.is_zero() {
            return Err(AppError::validation("Price must not be negative"));
        }
        let item = Self { quantity, price };
        item.subtotal()?;
        Ok(item)
    }

    pub fn parse(commodity: Commodity, input: &LineItemInput) -> Result<Self, AppError> {
        let quantity = parse_field(commodity, "quantity", &input.quantity)?;
        let price = parse_field(commodity, "price", &input.price)?;
        Self::new(quantity, price)
            .map_err(|err| AppError::validation(format!("{commodity}: {err}")))
    }

    /// `quantity × price`, unrounded. Fails when the product does not fit
    /// in a `Decimal`.
    pub fn subtotal(&self) -> Result<Decimal, AppError> {
        self.quantity
            .checked_mul(self.price)
            .ok_or_else(|| AppError::validation("Quantity × price is too large"))
    }
}

/// Finest scale a `Decimal` holds; longer fractions would be rounded on parse.
const MAX_INPUT_SCALE: usize = 28;

fn parse_field(commodity: Commodity, field: &str, raw: &str) -> Result<Decimal, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!(
            "{commodity} {field} is required"
        )));
    }
    let fraction_digits = trimmed.split_once('.').map_or(0, |(_, frac)| frac.len());
    if fraction_digits > MAX_INPUT_SCALE {
        return Err(AppError::validation(format!(
            "{commodity} {field} has more than {MAX_INPUT_SCALE} decimal places"
        )));
    }
    Decimal::from_str(trimmed).map_err(|_| {
        AppError::validation(format!("{commodity} {field} must be numeric: {trimmed}"))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItems {
    pub sugar: LineItem,
    pub salt: LineItem,
}

impl LineItems {
    /// Both items, checked so that the grand total is representable.
    pub fn new(sugar: LineItem, salt: LineItem) -> Result<Self, AppError> {
        let items = Self { sugar, salt };
        items.total()?;
        Ok(items)
    }

    pub fn get(&self, commodity: Commodity) -> &LineItem {
        match commodity {
            Commodity::Sugar => &self.sugar,
            Commodity::Salt => &self.salt,
        }
    }

    /// Exact sum of the subtotals. Never taken from client input.
    pub fn total(&self) -> Result<Decimal, AppError> {
        Commodity::ALL
            .iter()
            .try_fold(Decimal::ZERO, |acc, commodity| {
                acc.checked_add(self.get(*commodity).subtotal()?)
                    .ok_or_else(|| AppError::validation("Grand total is too large"))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub supervisor_id: String,
    pub supervisor_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: LineItems,
    pub status: SubmissionStatus,
    pub remarks: String,
    pub admin_remarks: String,
    pub evidence: Vec<EvidenceUrl>,
    pub location: Option<String>,
    pub version: i64,
}

impl Submission {
    pub fn total(&self) -> Result<Decimal, AppError> {
        self.items.total()
    }

    pub fn subtotal(&self, commodity: Commodity) -> Result<Decimal, AppError> {
        self.items.get(commodity).subtotal()
    }

    pub fn action_required_by(&self) -> Option<Role> {
        self.status.action_required_by()
    }
}

/// Fields the persistence layer needs to create a record. Identity,
/// timestamps and the initial status are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmissionRecord {
    pub supervisor_id: String,
    pub supervisor_name: String,
    pub items: LineItems,
    pub evidence: Vec<EvidenceUrl>,
    pub location: Option<String>,
}

impl NewSubmissionRecord {
    /// Builds the persisted shape: `Pending`, empty remarks, version 1.
    pub fn into_submission(self, id: SubmissionId, now: DateTime<Utc>) -> Submission {
        Submission {
            id,
            supervisor_id: self.supervisor_id,
            supervisor_name: self.supervisor_name,
            created_at: now,
            updated_at: now,
            items: self.items,
            status: SubmissionStatus::Pending,
            remarks: String::new(),
            admin_remarks: String::new(),
            evidence: self.evidence,
            location: self.location,
            version: 1,
        }
    }
}

/// Partial update guarded by the version the caller read.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPatch {
    pub expected_version: i64,
    pub status: Option<SubmissionStatus>,
    pub remarks: Option<String>,
    pub admin_remarks: Option<String>,
    pub items: Option<LineItems>,
    pub appended_evidence: Vec<EvidenceUrl>,
}

impl SubmissionPatch {
    pub fn new(expected_version: i64) -> Self {
        Self {
            expected_version,
            status: None,
            remarks: None,
            admin_remarks: None,
            items: None,
            appended_evidence: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_remarks(mut self, remarks: String) -> Self {
        self.remarks = Some(remarks);
        self
    }

    pub fn with_admin_remarks(mut self, admin_remarks: String) -> Self {
        self.admin_remarks = Some(admin_remarks);
        self
    }

    pub fn with_items(mut self, items: LineItems) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_appended_evidence(mut self, evidence: Vec<EvidenceUrl>) -> Self {
        self.appended_evidence = evidence;
        self
    }

    /// Applies the patch and bumps the version. Evidence is only ever appended.
    pub fn apply(self, mut submission: Submission, now: DateTime<Utc>) -> Submission {
        if let Some(status) = self.status {
            submission.status = status;
        }
        if let Some(remarks) = self.remarks {
            submission.remarks = remarks;
        }
        if let Some(admin_remarks) = self.admin_remarks {
            submission.admin_remarks = admin_remarks;
        }
        if let Some(items) = self.items {
            submission.items = items;
        }
        submission.evidence.extend(self.appended_evidence);
        submission.version += 1;
        submission.updated_at = now;
        submission
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub supervisor_id: Option<String>,
    pub status: Option<SubmissionStatus>,
}

impl SubmissionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_supervisor(supervisor_id: impl Into<String>) -> Self {
        Self {
            supervisor_id: Some(supervisor_id.into()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        let supervisor_ok = self
            .supervisor_id
            .as_deref()
            .map_or(true, |id| submission.supervisor_id == id);
        let status_ok = self.status.map_or(true, |status| submission.status == status);
        supervisor_ok && status_ok
    }
}
