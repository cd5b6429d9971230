use crate::domain::entities::SubmissionStats;
use crate::domain::value_objects::display_amount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesResponse {
    pub label: String,
    pub sales: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub pending_tasks: u32,
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
    pub total_submissions: u32,
    pub approved_total: String,
    pub monthly_sales: Vec<MonthlySalesResponse>,
}

impl From<SubmissionStats> for StatsResponse {
    fn from(stats: SubmissionStats) -> Self {
        Self {
            pending_tasks: stats.pending_tasks,
            pending: stats.status_counts.pending,
            approved: stats.status_counts.approved,
            rejected: stats.status_counts.rejected,
            total_submissions: stats.status_counts.total(),
            approved_total: display_amount(stats.approved_total),
            monthly_sales: stats
                .monthly_sales
                .into_iter()
                .map(|month| MonthlySalesResponse {
                    label: month.label,
                    sales: display_amount(month.sales),
                })
                .collect(),
        }
    }
}
