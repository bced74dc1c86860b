//! Payment repository port.

use async_trait::async_trait;

use crate::domain::billing::{NewPayment, Payment};
use crate::domain::foundation::{DomainError, PaymentId, Timestamp, UserId};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: NewPayment) -> Result<Payment, DomainError>;

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Persists every mutable field unconditionally.
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Writes a payment that has just moved out of `pending`, but only if the
    /// stored row is still pending. Returns false when another writer got
    /// there first; nothing is written in that case.
    async fn settle_if_pending(&self, payment: &Payment) -> Result<bool, DomainError>;

    /// Stores Click's transaction id on a pending payment without touching
    /// any other column. Returns false when the payment is no longer pending.
    async fn attach_click_transaction(
        &self,
        id: PaymentId,
        click_trans_id: &str,
        now: Timestamp,
    ) -> Result<bool, DomainError>;

    /// Payments of a user, newest first.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Payment>, DomainError>;
}
