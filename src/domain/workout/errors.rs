//! Workout session error types.

use crate::domain::foundation::{
    DomainError, EditionId, ErrorCode, ValidationError, WorkoutSessionId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkoutError {
    SessionNotFound(WorkoutSessionId),
    EditionNotFound(EditionId),
    DayNotInPlan { edition_id: EditionId, day_number: i32 },
    InvalidState(String),
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl WorkoutError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        WorkoutError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WorkoutError::SessionNotFound(_) => ErrorCode::WorkoutSessionNotFound,
            WorkoutError::EditionNotFound(_) => ErrorCode::EditionNotFound,
            WorkoutError::DayNotInPlan { .. } => ErrorCode::ValidationFailed,
            WorkoutError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            WorkoutError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            WorkoutError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            WorkoutError::SessionNotFound(_) => "Workout session not found".to_string(),
            WorkoutError::EditionNotFound(_) => "Edition not found".to_string(),
            WorkoutError::DayNotInPlan { day_number, .. } => {
                format!("Day {} is not part of this edition", day_number)
            }
            WorkoutError::InvalidState(msg) => msg.clone(),
            WorkoutError::ValidationFailed { message, .. } => message.clone(),
            WorkoutError::Infrastructure(_) => "Internal error".to_string(),
        }
    }

    /// Maps a rejected status transition or metric check.
    pub fn from_rejection(err: ValidationError) -> Self {
        if err.field() == "state_transition" {
            WorkoutError::InvalidState(err.to_string())
        } else {
            WorkoutError::ValidationFailed {
                field: err.field().to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl std::fmt::Display for WorkoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkoutError::Infrastructure(detail) => write!(f, "{}: {}", self.code(), detail),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl std::error::Error for WorkoutError {}

impl From<DomainError> for WorkoutError {
    fn from(err: DomainError) -> Self {
        WorkoutError::infrastructure(err.to_string())
    }
}
