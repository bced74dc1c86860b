//! Billing error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | SubscriptionNotFound | 404 |
//! | PaymentNotFound | 404 |
//! | PaymentMethodNotFound | 404 |
//! | InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Gateway | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, UserId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// The user has no subscription.
    SubscriptionNotFound(UserId),

    PaymentNotFound(PaymentId),

    /// The user has no stored card.
    PaymentMethodNotFound(UserId),

    /// Operation not allowed in the current state.
    InvalidState(String),

    ValidationFailed { field: String, message: String },

    /// The payment gateway rejected or failed a request.
    Gateway(String),

    Infrastructure(String),
}

impl BillingError {
    pub fn subscription_not_found(user_id: UserId) -> Self {
        BillingError::SubscriptionNotFound(user_id)
    }

    pub fn payment_not_found(id: PaymentId) -> Self {
        BillingError::PaymentNotFound(id)
    }

    pub fn payment_method_not_found(user_id: UserId) -> Self {
        BillingError::PaymentMethodNotFound(user_id)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        BillingError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        BillingError::Gateway(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BillingError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            BillingError::PaymentNotFound(_) => ErrorCode::PaymentNotFound,
            BillingError::PaymentMethodNotFound(_) => ErrorCode::PaymentMethodNotFound,
            BillingError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            BillingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BillingError::Gateway(_) => ErrorCode::GatewayError,
            BillingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            BillingError::SubscriptionNotFound(_) => "No subscription found".to_string(),
            BillingError::PaymentNotFound(id) => format!("Payment {} not found", id),
            BillingError::PaymentMethodNotFound(_) => "No card on file".to_string(),
            BillingError::InvalidState(msg) => msg.clone(),
            BillingError::ValidationFailed { message, .. } => message.clone(),
            BillingError::Gateway(_) => "Payment gateway unavailable".to_string(),
            BillingError::Infrastructure(_) => "Internal error".to_string(),
        }
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingError::Gateway(detail) | BillingError::Infrastructure(detail) => {
                write!(f, "{}: {}", self.code(), detail)
            }
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl std::error::Error for BillingError {}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => BillingError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition | ErrorCode::DuplicateTransaction => {
                BillingError::InvalidState(err.message)
            }
            _ => BillingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for BillingError {
    fn from(err: ValidationError) -> Self {
        if err.field() == "state_transition" {
            BillingError::InvalidState(err.to_string())
        } else {
            BillingError::ValidationFailed {
                field: err.field().to_string(),
                message: err.to_string(),
            }
        }
    }
}
