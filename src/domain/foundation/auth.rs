//! Authentication domain types.
//!
//! `AuthenticatedUser` is what the HTTP layer hands to handlers after a session
//! token has been validated. `AuthError` describes token failures from the
//! application's point of view, independent of how tokens are encoded.

use super::{TelegramId, UserId};
use thiserror::Error;

/// Identity carried by a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Internal profile id.
    pub id: UserId,

    /// Telegram account the session was issued for.
    pub telegram_id: TelegramId,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, telegram_id: TelegramId) -> Self {
        Self { id, telegram_id }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Telegram init data failed verification.
    #[error("Telegram init data rejected: {0}")]
    InvalidInitData(String),

    /// Token issuing failed (misconfiguration, encoding failure).
    #[error("Could not issue session: {0}")]
    IssueFailed(String),
}

impl AuthError {
    /// Returns true if this error indicates the client should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
