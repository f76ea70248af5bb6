use thiserror::Error;

use shared_models::error::AppError;

use crate::models::{VisitContext, VisitStatus};
use crate::services::transition::VisitAction;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisitError {
    #[error("Cannot {action} a visit that is {from}")]
    InvalidTransition { from: VisitStatus, action: VisitAction },

    #[error("Status '{status}' is not used by the {context} screen")]
    StatusNotInContext { status: VisitStatus, context: VisitContext },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record already exists: {0}")]
    DuplicateId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

impl From<VisitError> for AppError {
    fn from(err: VisitError) -> Self {
        match err {
            VisitError::NotFound(_) => AppError::NotFound(err.to_string()),
            VisitError::DuplicateId(_) => AppError::Conflict(err.to_string()),
            VisitError::Validation(_) => AppError::ValidationError(err.to_string()),
            VisitError::InvalidTransition { .. }
            | VisitError::StatusNotInContext { .. }
            | VisitError::InvalidMonth { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}
