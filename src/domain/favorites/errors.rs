//! Favorites error types.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | FavoriteNotFound / CollectionNotFound / ExerciseNotFound | 404 |
//! | CollectionExists | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    CollectionId, DomainError, ErrorCode, ExerciseId, FavoriteId, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteError {
    FavoriteNotFound(FavoriteId),
    CollectionNotFound(CollectionId),
    ExerciseNotFound(ExerciseId),
    CollectionExists(String),
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl FavoriteError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FavoriteError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        FavoriteError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FavoriteError::FavoriteNotFound(_) => ErrorCode::FavoriteNotFound,
            FavoriteError::CollectionNotFound(_) => ErrorCode::CollectionNotFound,
            FavoriteError::ExerciseNotFound(_) => ErrorCode::ExerciseNotFound,
            FavoriteError::CollectionExists(_) => ErrorCode::CollectionExists,
            FavoriteError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            FavoriteError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            FavoriteError::FavoriteNotFound(_) => "Favorite not found".to_string(),
            FavoriteError::CollectionNotFound(_) => "Collection not found".to_string(),
            FavoriteError::ExerciseNotFound(_) => "Exercise not found".to_string(),
            FavoriteError::CollectionExists(name) => {
                format!("A collection named '{}' already exists", name)
            }
            FavoriteError::ValidationFailed { message, .. } => message.clone(),
            FavoriteError::Infrastructure(_) => "Internal error".to_string(),
        }
    }
}

impl std::fmt::Display for FavoriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoriteError::Infrastructure(detail) => write!(f, "{}: {}", self.code(), detail),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl std::error::Error for FavoriteError {}

impl From<DomainError> for FavoriteError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::CollectionExists => FavoriteError::CollectionExists(
                err.details.get("name").cloned().unwrap_or_default(),
            ),
            _ => FavoriteError::infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for FavoriteError {
    fn from(err: ValidationError) -> Self {
        FavoriteError::validation(err.field().to_string(), err.to_string())
    }
}
