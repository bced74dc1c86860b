//! ProfileRepository port for user profile persistence.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TelegramId, UserId};
use crate::domain::profile::{NewUserProfile, UserProfile};

/// Repository for Mini App user profiles.
///
/// # Contract
///
/// - `telegram_id` is unique; `create` fails with `ErrorCode::UserExists` when
///   a profile for the same Telegram account already exists.
/// - Motivations are stored as a set and returned in a stable order.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a profile and return it with its assigned id.
    async fn create(&self, profile: NewUserProfile) -> Result<UserProfile, DomainError>;

    /// Persist every mutable field of an existing profile.
    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, DomainError>;

    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<UserProfile>, DomainError>;
}
