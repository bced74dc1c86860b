//! Catalog error types.

use crate::domain::foundation::{DomainError, EditionId, ErrorCode, ExerciseId, ProgramId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    ExerciseNotFound(ExerciseId),
    MuscleGroupNotFound(String),
    ProgramNotFound(ProgramId),
    EditionNotFound(EditionId),
    Infrastructure(String),
}

impl CatalogError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        CatalogError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::ExerciseNotFound(_) | CatalogError::MuscleGroupNotFound(_) => {
                ErrorCode::ExerciseNotFound
            }
            CatalogError::ProgramNotFound(_) => ErrorCode::ProgramNotFound,
            CatalogError::EditionNotFound(_) => ErrorCode::EditionNotFound,
            CatalogError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CatalogError::ExerciseNotFound(id) => format!("Exercise {} not found", id),
            CatalogError::MuscleGroupNotFound(name) => format!("Muscle group '{}' not found", name),
            CatalogError::ProgramNotFound(id) => format!("Program {} not found", id),
            CatalogError::EditionNotFound(id) => format!("Edition {} not found", id),
            CatalogError::Infrastructure(_) => "Internal error".to_string(),
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Infrastructure(detail) => write!(f, "{}: {}", self.code(), detail),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        CatalogError::infrastructure(err.to_string())
    }
}
