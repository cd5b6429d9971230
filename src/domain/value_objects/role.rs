use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Supervisor,
    Validator,
    Admin,
    SuperAdmin,
}

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateSubmission,
    ResubmitSubmission,
    ValidateSubmission,
    AnnotateSubmission,
    ListOwnSubmissions,
    ListAllSubmissions,
    ViewStats,
    SyncOfflineQueue,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Supervisor => "supervisor",
            Role::Validator => "validator",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    pub fn permits(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::Supervisor => matches!(
                permission,
                CreateSubmission | ResubmitSubmission | ListOwnSubmissions | SyncOfflineQueue
            ),
            Role::Validator => matches!(
                permission,
                ValidateSubmission | ListOwnSubmissions | ListAllSubmissions
            ),
            Role::Admin => matches!(
                permission,
                AnnotateSubmission | ListOwnSubmissions | ListAllSubmissions
            ),
            Role::SuperAdmin => matches!(
                permission,
                ViewStats | ListOwnSubmissions | ListAllSubmissions
            ),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "supervisor" => Ok(Role::Supervisor),
            "validator" => Ok(Role::Validator),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}
