use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Storage(_) => "storage_error",
            AppError::Network(_) => "network_error",
            AppError::Database(_) => "database_error",
            AppError::SerializationError(_) => "serialization_error",
            AppError::ConfigurationError(_) => "configuration_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Errors worth another attempt on the next sync trigger.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Storage(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(message.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Storage(err.to_string())
            }
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<rust_decimal::Error> for AppError {
    fn from(err: rust_decimal::Error) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_only_for_transport_failures() {
        assert!(AppError::Network("offline".into()).is_retryable());
        assert!(AppError::Storage("disk full".into()).is_retryable());
        assert!(!AppError::ValidationError("bad".into()).is_retryable());
        assert!(!AppError::InvalidTransition("approved".into()).is_retryable());
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(AppError::NotFound("x".into()).code(), "not_found");
        assert_eq!(
            AppError::InvalidTransition("x".into()).code(),
            "invalid_transition"
        );
    }
}
