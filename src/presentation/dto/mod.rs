pub mod offline_dto;
pub mod stats_dto;
pub mod submission_dto;

use crate::shared::AppError;
use serde::{Deserialize, Serialize};

/// Envelope returned to UI callers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub error_code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    pub fn from_app_error(error: AppError) -> Self {
        Self {
            success: false,
            data: None,
            error_code: Some(error.code().to_string()),
            error: Some(error.to_string()),
        }
    }

    pub fn from_result(result: crate::shared::Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_app_error(err),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
