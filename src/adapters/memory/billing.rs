//! In-memory subscription, payment and stored card repositories.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::Mutex;

use super::{lock, Sequence};
use crate::domain::billing::{
    CardDetails, NewPayment, NewSubscription, Payment, PaymentMethod, PaymentStatus, Subscription,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentId, PaymentMethodId, SubscriptionId, Timestamp, UserId,
};
use crate::ports::{PaymentMethodRepository, PaymentRepository, SubscriptionRepository};

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Mutex<Vec<Subscription>>,
    ids: Sequence,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a subscription as-is, for seeding tests.
    pub fn insert(&self, subscription: Subscription) {
        if let Ok(mut subs) = self.subscriptions.lock() {
            subs.retain(|s| s.user_id != subscription.user_id);
            subs.push(subscription);
        }
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, subscription: NewSubscription) -> Result<Subscription, DomainError> {
        let mut subs = lock(&self.subscriptions)?;
        if subs.iter().any(|s| s.user_id == subscription.user_id) {
            return Err(DomainError::new(
                ErrorCode::SubscriptionExists,
                "User already has a subscription",
            ));
        }
        let mut id = self.ids.next()?;
        while subs.iter().any(|s| s.id.as_i64() == id) {
            id = self.ids.next()?;
        }
        let created = subscription.into_subscription(SubscriptionId::new(id));
        subs.push(created.clone());
        Ok(created)
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subs = lock(&self.subscriptions)?;
        match subs.iter_mut().find(|s| s.id == subscription.id) {
            Some(stored) => {
                *stored = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            )),
        }
    }

    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(lock(&self.subscriptions)?.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Subscription>, DomainError> {
        Ok(lock(&self.subscriptions)?
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Subscription>, DomainError> {
        Ok(lock(&self.subscriptions)?
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<Vec<Payment>>,
    ids: Sequence,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Payment> {
        match self.payments.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        let created = payment.into_payment(PaymentId::new(self.ids.next()?));
        lock(&self.payments)?.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(lock(&self.payments)?.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = lock(&self.payments)?;
        if let Some(txn) = &payment.transaction_id {
            if payments
                .iter()
                .any(|p| p.id != payment.id && p.transaction_id.as_ref() == Some(txn))
            {
                return Err(DomainError::new(
                    ErrorCode::DuplicateTransaction,
                    "Transaction id already recorded",
                ));
            }
        }
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(stored) => {
                *stored = payment.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::PaymentNotFound, "Payment not found")),
        }
    }

    async fn settle_if_pending(&self, payment: &Payment) -> Result<bool, DomainError> {
        {
            let payments = lock(&self.payments)?;
            let still_pending = payments
                .iter()
                .any(|p| p.id == payment.id && p.status == PaymentStatus::Pending);
            if !still_pending {
                return Ok(false);
            }
        }
        self.update(payment).await?;
        Ok(true)
    }

    async fn attach_click_transaction(
        &self,
        id: PaymentId,
        click_trans_id: &str,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        let mut payments = lock(&self.payments)?;
        match payments
            .iter_mut()
            .find(|p| p.id == id && p.status == PaymentStatus::Pending)
        {
            Some(stored) => {
                stored.click_trans_id = Some(click_trans_id.to_string());
                stored.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Payment>, DomainError> {
        let mut owned: Vec<Payment> = lock(&self.payments)?
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|p| Reverse((p.created_at, p.id)));
        Ok(owned)
    }
}

#[derive(Default)]
pub struct InMemoryPaymentMethodRepository {
    methods: Mutex<Vec<PaymentMethod>>,
    ids: Sequence,
}

impl InMemoryPaymentMethodRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentMethodRepository for InMemoryPaymentMethodRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<PaymentMethod>, DomainError> {
        Ok(lock(&self.methods)?
            .iter()
            .find(|m| m.user_id == user_id)
            .cloned())
    }

    async fn upsert(
        &self,
        user_id: UserId,
        card: CardDetails,
        now: Timestamp,
    ) -> Result<PaymentMethod, DomainError> {
        let mut methods = lock(&self.methods)?;
        if let Some(existing) = methods.iter_mut().find(|m| m.user_id == user_id) {
            existing.replace(card, now);
            return Ok(existing.clone());
        }
        let created = card.into_method(PaymentMethodId::new(self.ids.next()?), user_id, now);
        methods.push(created.clone());
        Ok(created)
    }

    async fn update(&self, method: &PaymentMethod) -> Result<(), DomainError> {
        let mut methods = lock(&self.methods)?;
        match methods.iter_mut().find(|m| m.id == method.id) {
            Some(stored) => {
                *stored = method.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PaymentMethodNotFound,
                "Payment method not found",
            )),
        }
    }
}
