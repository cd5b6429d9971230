use crate::domain::value_objects::{Permission, Role};
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};

/// An authenticated user acting in a session. Authentication itself happens
/// outside this crate; the actor is handed over already verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.role.permits(permission) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "{} ({}) may not perform {:?}",
                self.id, self.role, permission
            )))
        }
    }
}
