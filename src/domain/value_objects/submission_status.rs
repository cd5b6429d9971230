use super::role::Role;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 3] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    /// Role expected to act next on a submission in this status.
    pub fn action_required_by(&self) -> Option<Role> {
        match self {
            SubmissionStatus::Pending => Some(Role::Validator),
            SubmissionStatus::Rejected => Some(Role::Supervisor),
            SubmissionStatus::Approved => None,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            other => Err(format!("Unknown submission status: {other}")),
        }
    }
}

/// Outcome a validator can record against a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn target_status(&self) -> SubmissionStatus {
        match self {
            ReviewDecision::Approved => SubmissionStatus::Approved,
            ReviewDecision::Rejected => SubmissionStatus::Rejected,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<SubmissionStatus>()? {
            SubmissionStatus::Approved => Ok(ReviewDecision::Approved),
            SubmissionStatus::Rejected => Ok(ReviewDecision::Rejected),
            SubmissionStatus::Pending => Err("Pending is not a review decision".to_string()),
        }
    }
}
