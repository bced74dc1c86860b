//! JSON error envelope shared by every endpoint.
//!
//! | ErrorCode family | HTTP Status |
//! |------------------|-------------|
//! | *NotFound | 404 |
//! | Validation | 400 |
//! | *Exists, DuplicateTransaction, InvalidStateTransition | 409 |
//! | Unauthorized | 401 |
//! | Forbidden | 403 |
//! | GatewayError | 502 |
//! | DatabaseError, InternalError | 500 |

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

        ErrorCode::UserNotFound
        | ErrorCode::ExerciseNotFound
        | ErrorCode::ProgramNotFound
        | ErrorCode::EditionNotFound
        | ErrorCode::FavoriteNotFound
        | ErrorCode::CollectionNotFound
        | ErrorCode::SubscriptionNotFound
        | ErrorCode::PaymentNotFound
        | ErrorCode::PaymentMethodNotFound
        | ErrorCode::WorkoutSessionNotFound => StatusCode::NOT_FOUND,

        ErrorCode::UserExists
        | ErrorCode::CollectionExists
        | ErrorCode::FavoriteExists
        | ErrorCode::SubscriptionExists
        | ErrorCode::DuplicateTransaction
        | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,

        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::GatewayError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds the response for a module error. Server-side failures are logged
/// with their full detail; the body only carries the public message.
pub(crate) fn error_response(code: ErrorCode, message: String, detail: &dyn Display) -> Response {
    let status = status_for(code);
    if status.is_server_error() {
        tracing::error!(code = %code, error = %detail, "request failed");
    } else {
        tracing::debug!(code = %code, error = %detail, "request rejected");
    }
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

/// Declares `$api` as the HTTP face of the module error `$err`, which must
/// provide `code()` and `message()`.
macro_rules! api_error {
    ($(#[$meta:meta])* $api:ident, $err:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $api(pub $err);

        impl From<$err> for $api {
            fn from(err: $err) -> Self {
                Self(err)
            }
        }

        impl axum::response::IntoResponse for $api {
            fn into_response(self) -> axum::response::Response {
                $crate::adapters::http::error::error_response(
                    self.0.code(),
                    self.0.message(),
                    &self.0,
                )
            }
        }
    };
}

pub(crate) use api_error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes_map_to_404() {
        assert_eq!(status_for(ErrorCode::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::PaymentMethodNotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflicts_map_to_409() {
        assert_eq!(status_for(ErrorCode::CollectionExists), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorCode::InvalidStateTransition), StatusCode::CONFLICT);
    }

    #[test]
    fn gateway_maps_to_502() {
        assert_eq!(status_for(ErrorCode::GatewayError), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn server_errors_keep_detail_out_of_body() {
        let response = error_response(
            ErrorCode::DatabaseError,
            "Internal error".to_string(),
            &"connection reset by peer",
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
