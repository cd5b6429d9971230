use crate::domain::value_objects::SubmissionStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
}

impl StatusCounts {
    pub fn increment(&mut self, status: SubmissionStatus) {
        match status {
            SubmissionStatus::Pending => self.pending += 1,
            SubmissionStatus::Approved => self.approved += 1,
            SubmissionStatus::Rejected => self.rejected += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.pending + self.approved + self.rejected
    }
}

/// Approved sales for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub sales: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStats {
    pub pending_tasks: u32,
    pub status_counts: StatusCounts,
    pub approved_total: Decimal,
    pub monthly_sales: Vec<MonthlySales>,
}
