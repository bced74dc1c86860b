//! Profile-specific error types.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound / NotFoundForTelegram | 404 |
//! | ValidationFailed | 400 |
//! | Unauthorized | 401 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, TelegramId, UserId, ValidationError};

/// Errors raised by onboarding and profile operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    NotFound(UserId),
    NotFoundForTelegram(TelegramId),
    ValidationFailed { field: String, message: String },
    Unauthorized(String),
    Infrastructure(String),
}

impl ProfileError {
    pub fn not_found(id: UserId) -> Self {
        ProfileError::NotFound(id)
    }

    pub fn not_found_for_telegram(id: TelegramId) -> Self {
        ProfileError::NotFoundForTelegram(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ProfileError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ProfileError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ProfileError::NotFound(_) | ProfileError::NotFoundForTelegram(_) => {
                ErrorCode::UserNotFound
            }
            ProfileError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ProfileError::Unauthorized(_) => ErrorCode::Unauthorized,
            ProfileError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ProfileError::NotFound(_) | ProfileError::NotFoundForTelegram(_) => {
                "User not found".to_string()
            }
            ProfileError::ValidationFailed { message, .. } => message.clone(),
            ProfileError::Unauthorized(reason) => reason.clone(),
            ProfileError::Infrastructure(_) => "Internal error".to_string(),
        }
    }
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Infrastructure(detail) => write!(f, "{}: {}", self.code(), detail),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl std::error::Error for ProfileError {}

impl From<DomainError> for ProfileError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => ProfileError::validation(
                err.details.get("field").cloned().unwrap_or_default(),
                err.message,
            ),
            _ => ProfileError::infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for ProfileError {
    fn from(err: ValidationError) -> Self {
        ProfileError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<AuthError> for ProfileError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::IssueFailed(detail) => ProfileError::infrastructure(detail),
            other => ProfileError::Unauthorized(other.to_string()),
        }
    }
}
