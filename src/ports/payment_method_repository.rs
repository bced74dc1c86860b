//! Stored card repository port.

use async_trait::async_trait;

use crate::domain::billing::{CardDetails, PaymentMethod};
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// One stored card per user.
#[async_trait]
pub trait PaymentMethodRepository: Send + Sync {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<PaymentMethod>, DomainError>;

    /// Inserts the user's card or replaces the existing one, leaving it active.
    async fn upsert(
        &self,
        user_id: UserId,
        card: CardDetails,
        now: Timestamp,
    ) -> Result<PaymentMethod, DomainError>;

    async fn update(&self, method: &PaymentMethod) -> Result<(), DomainError>;
}
