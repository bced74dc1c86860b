//! Subscription repository port.
//!
//! # Example
//!
//! ```ignore
//! let mut sub = repo.find_by_user(user_id).await?.ok_or(...)?;
//! sub.extend(policy.period_days, now);
//! repo.update(&sub).await?;
//! ```

use async_trait::async_trait;

use crate::domain::billing::{NewSubscription, Subscription};
use crate::domain::foundation::{DomainError, SubscriptionId, UserId};

/// Persistence for subscriptions. One per user.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// # Errors
    ///
    /// - `SubscriptionExists` if the user already has one
    /// - `DatabaseError` on persistence failure
    async fn create(&self, subscription: NewSubscription) -> Result<Subscription, DomainError>;

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Subscription>, DomainError>;

    /// Every subscription with `is_active = true`, for the scheduled jobs.
    async fn list_active(&self) -> Result<Vec<Subscription>, DomainError>;
}
