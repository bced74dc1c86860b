//! CompleteClickPaymentHandler - second phase of the Click handshake.
//!
//! Settles the payment and grants or extends premium access.

use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;

use super::click_callback::{storage_fault, validate_callback};
use super::notify_user;
use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::billing::{
    notice, BillingPolicy, ClickAction, ClickCallback, ClickErrorCode, ClickResponse,
    FailureOutcome, NewSubscription, Payment, Subscription,
};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{
    ActivityLog, Notifier, PaymentRepository, ProfileRepository, SubscriptionRepository,
};

pub struct CompleteClickPaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    profiles: Arc<dyn ProfileRepository>,
    activity: Arc<dyn ActivityLog>,
    notifier: Arc<dyn Notifier>,
    secret_key: SecretString,
    policy: BillingPolicy,
}

impl CompleteClickPaymentHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        profiles: Arc<dyn ProfileRepository>,
        activity: Arc<dyn ActivityLog>,
        notifier: Arc<dyn Notifier>,
        secret_key: SecretString,
        policy: BillingPolicy,
    ) -> Self {
        Self {
            payments,
            subscriptions,
            profiles,
            activity,
            notifier,
            secret_key,
            policy,
        }
    }

    /// Always produces a gateway response; failures become error codes.
    pub async fn handle(&self, callback: ClickCallback) -> ClickResponse {
        match self.complete(&callback).await {
            Ok(response) => response,
            Err(code) => {
                tracing::info!(
                    merchant_trans_id = %callback.merchant_trans_id,
                    error = code.code(),
                    "click complete rejected"
                );
                ClickResponse::error(code)
            }
        }
    }

    async fn complete(&self, callback: &ClickCallback) -> Result<ClickResponse, ClickErrorCode> {
        // 1. Same checks as prepare
        let mut payment = validate_callback(
            self.payments.as_ref(),
            callback,
            &self.secret_key,
            ClickAction::Complete,
        )
        .await?;
        let now = Timestamp::now();

        // 2. Click reports the charge itself failed
        if !callback.gateway_succeeded() {
            self.fail_payment(&mut payment, callback, now).await?;
            return Err(ClickErrorCode::TransactionCancelled);
        }

        // 3. Settle. The pending guard stops a duplicate complete from
        //    extending the subscription twice.
        payment.click_trans_id = Some(callback.click_trans_id.clone());
        payment
            .complete(Some(callback.click_trans_id.clone()), callback.to_metadata(), now)
            .map_err(|_| ClickErrorCode::AlreadyPaid)?;
        match self.payments.settle_if_pending(&payment).await {
            Ok(true) => {}
            Ok(false) => return Err(ClickErrorCode::AlreadyPaid),
            Err(err) if err.code == ErrorCode::DuplicateTransaction => {
                return Err(ClickErrorCode::AlreadyPaid)
            }
            Err(err) => return Err(storage_fault(err)),
        }

        // 4. Grant access. The payment is already stored as completed, so
        //    Click must hear success even when the extension fails; the
        //    unlinked payment is left for reconciliation.
        let subscription = match self.activate_subscription(&payment, now).await {
            Ok(subscription) => subscription,
            Err(err) => {
                tracing::error!(
                    payment_id = %payment.id,
                    user_id = %payment.user_id,
                    error = %err,
                    "payment settled but subscription was not extended; needs reconciliation"
                );
                self.record_completed(&payment, callback).await;
                return Ok(ClickResponse::confirmed(callback, payment.id));
            }
        };

        // 5. Link the payment to the subscription it paid for
        payment.link_subscription(subscription.id);
        if let Err(err) = self.payments.update(&payment).await {
            tracing::warn!(payment_id = %payment.id, error = %err, "failed to link payment to subscription");
        }

        self.record_completed(&payment, callback).await;
        notify_user(
            self.profiles.as_ref(),
            self.notifier.as_ref(),
            payment.user_id,
            notice::payment_received(payment.amount, subscription.end_date),
        )
        .await;

        tracing::info!(
            payment_id = %payment.id,
            subscription_id = %subscription.id,
            "click payment completed"
        );
        Ok(ClickResponse::confirmed(callback, payment.id))
    }

    async fn record_completed(&self, payment: &Payment, callback: &ClickCallback) {
        record_activity(
            self.activity.as_ref(),
            UserActivity::new(
                payment.user_id,
                ActivityKind::PaymentCompleted,
                json!({
                    "payment_id": payment.id,
                    "amount": payment.amount.to_string(),
                    "click_trans_id": callback.click_trans_id,
                }),
            ),
        )
        .await;
    }

    async fn fail_payment(
        &self,
        payment: &mut Payment,
        callback: &ClickCallback,
        now: Timestamp,
    ) -> Result<(), ClickErrorCode> {
        payment
            .fail(callback.to_metadata(), now)
            .map_err(|_| ClickErrorCode::TransactionCancelled)?;
        if !self
            .payments
            .settle_if_pending(payment)
            .await
            .map_err(storage_fault)?
        {
            return Err(ClickErrorCode::AlreadyPaid);
        }
        tracing::warn!(
            payment_id = %payment.id,
            click_error = ?callback.error,
            "click reported a failed payment"
        );

        let Some(subscription_id) = payment.subscription_id else {
            return Ok(());
        };
        let Some(mut subscription) = self
            .subscriptions
            .find_by_id(subscription_id)
            .await
            .map_err(storage_fault)?
        else {
            return Ok(());
        };
        let outcome = subscription.record_failed_payment(self.policy.max_payment_attempts, now);
        self.subscriptions
            .update(&subscription)
            .await
            .map_err(storage_fault)?;
        if let FailureOutcome::Deactivated { attempts } = outcome {
            tracing::warn!(subscription_id = %subscription.id, attempts, "subscription deactivated after failed payments");
        }
        Ok(())
    }

    /// Extends the user's subscription, creating it on the first payment.
    async fn activate_subscription(
        &self,
        payment: &Payment,
        now: Timestamp,
    ) -> Result<Subscription, DomainError> {
        if let Some(existing) = self.subscriptions.find_by_user(payment.user_id).await? {
            return self.extend(existing, payment, now).await;
        }

        let first = NewSubscription::first_period(
            payment.user_id,
            payment.amount,
            self.policy.period_days,
            now,
        );
        match self.subscriptions.create(first).await {
            Ok(created) => Ok(created),
            Err(err) if err.code == ErrorCode::SubscriptionExists => {
                let existing = self
                    .subscriptions
                    .find_by_user(payment.user_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::new(ErrorCode::InternalError, "subscription vanished after conflict")
                    })?;
                self.extend(existing, payment, now).await
            }
            Err(err) => Err(err),
        }
    }

    /// Only an automatic renewal clears the failure counter.
    async fn extend(
        &self,
        mut subscription: Subscription,
        payment: &Payment,
        now: Timestamp,
    ) -> Result<Subscription, DomainError> {
        subscription.extend(self.policy.period_days, now);
        if payment.is_auto_payment {
            subscription.reset_failures(now);
        }
        self.subscriptions.update(&subscription).await?;
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{callback, price, BillingFixture, SECRET};
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::domain::billing::{NewPayment, PaymentStatus};
    use async_trait::async_trait;
    use crate::domain::foundation::{SubscriptionId, UserId};

    struct Setup {
        handler: CompleteClickPaymentHandler,
        fixture: BillingFixture,
        user: UserId,
    }

    async fn setup() -> Setup {
        let fixture = BillingFixture::new();
        let (user, _) = fixture.user(7001).await;
        let handler = CompleteClickPaymentHandler::new(
            fixture.payments.clone(),
            fixture.subscriptions.clone(),
            fixture.profiles.clone(),
            fixture.activity.clone(),
            fixture.notifier.clone(),
            SecretString::new(SECRET.to_string()),
            BillingPolicy::default(),
        );
        Setup {
            handler,
            fixture,
            user,
        }
    }

    async fn pending(s: &Setup) -> i64 {
        s.fixture
            .payments
            .create(NewPayment::manual(s.user, price(), Timestamp::now()))
            .await
            .unwrap()
            .id
            .as_i64()
    }

    #[tokio::test]
    async fn first_payment_creates_thirty_day_subscription() {
        let s = setup().await;
        let id = pending(&s).await;
        let before = Timestamp::now();

        let response = s.handler.handle(callback(id, "67000", "1", "0")).await;

        assert_eq!(response.error, 0);
        assert_eq!(response.merchant_confirm_id, Some(id));
        let payment = &s.fixture.payments.all()[0];
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.completed_at.is_some());
        assert_eq!(payment.transaction_id.as_deref(), Some(format!("ct-{}", id).as_str()));

        let sub = s.fixture.subscriptions.find_by_user(s.user).await.unwrap().unwrap();
        assert!(sub.is_active);
        assert!(sub.auto_renew);
        assert_eq!(sub.price, price());
        assert_eq!(payment.subscription_id, Some(sub.id));
        let end = sub.end_date.unwrap();
        assert!(!end.is_before(&before.add_days(30)));
        assert!(!end.is_after(&Timestamp::now().add_days(30)));

        assert_eq!(
            s.fixture.activity.kinds_for(s.user),
            vec![ActivityKind::PaymentCompleted]
        );
        assert_eq!(s.fixture.notifier.sent().len(), 1);
    }

    fn subscription_with_failures(s: &Setup, failures: usize, now: Timestamp) {
        let mut existing = NewSubscription::first_period(s.user, price(), 30, now)
            .into_subscription(SubscriptionId::new(50));
        existing.end_date = Some(now.add_days(10));
        for _ in 0..failures {
            existing.record_failed_payment(3, now);
        }
        s.fixture.subscriptions.insert(existing);
    }

    #[tokio::test]
    async fn manual_renewal_extends_from_current_end_and_keeps_failures() {
        let s = setup().await;
        let now = Timestamp::now();
        subscription_with_failures(&s, 2, now);
        let id = pending(&s).await;

        let response = s.handler.handle(callback(id, "67000.00", "1", "0")).await;

        assert_eq!(response.error, 0);
        let sub = s.fixture.subscriptions.find_by_user(s.user).await.unwrap().unwrap();
        assert_eq!(sub.end_date, Some(now.add_days(40)));
        assert_eq!(sub.failed_payment_count, 2);
        assert!(sub.last_failed_at.is_some());
        assert!(sub.is_active);
    }

    #[tokio::test]
    async fn automatic_payment_resets_failures() {
        let s = setup().await;
        let now = Timestamp::now();
        subscription_with_failures(&s, 2, now);
        let payment = s
            .fixture
            .payments
            .create(NewPayment::automatic(s.user, SubscriptionId::new(50), price(), 3, now))
            .await
            .unwrap();

        let response = s
            .handler
            .handle(callback(payment.id.as_i64(), "67000", "1", "0"))
            .await;

        assert_eq!(response.error, 0);
        let sub = s.fixture.subscriptions.find_by_user(s.user).await.unwrap().unwrap();
        assert_eq!(sub.end_date, Some(now.add_days(40)));
        assert_eq!(sub.failed_payment_count, 0);
        assert!(sub.last_failed_at.is_none());
    }

    /// Reads pass through; every write fails.
    struct ReadOnlySubscriptions(Arc<InMemorySubscriptionRepository>);

    #[async_trait]
    impl SubscriptionRepository for ReadOnlySubscriptions {
        async fn create(&self, _: NewSubscription) -> Result<Subscription, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "connection reset"))
        }

        async fn update(&self, _: &Subscription) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "connection reset"))
        }

        async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
            self.0.find_by_id(id).await
        }

        async fn find_by_user(&self, user_id: UserId) -> Result<Option<Subscription>, DomainError> {
            self.0.find_by_user(user_id).await
        }

        async fn list_active(&self) -> Result<Vec<Subscription>, DomainError> {
            self.0.list_active().await
        }
    }

    #[tokio::test]
    async fn settled_payment_is_confirmed_even_when_subscription_write_fails() {
        let s = setup().await;
        let handler = CompleteClickPaymentHandler::new(
            s.fixture.payments.clone(),
            Arc::new(ReadOnlySubscriptions(s.fixture.subscriptions.clone())),
            s.fixture.profiles.clone(),
            s.fixture.activity.clone(),
            s.fixture.notifier.clone(),
            SecretString::new(SECRET.to_string()),
            BillingPolicy::default(),
        );
        let id = pending(&s).await;

        let response = handler.handle(callback(id, "67000", "1", "0")).await;

        let payment = &s.fixture.payments.all()[0];
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(response.error, 0);
        assert_eq!(response.merchant_confirm_id, Some(id));
        assert!(payment.subscription_id.is_none());
        assert_eq!(
            s.fixture.activity.kinds_for(s.user),
            vec![ActivityKind::PaymentCompleted]
        );
        assert!(s.fixture.notifier.sent().is_empty());

        let retry = handler.handle(callback(id, "67000", "1", "0")).await;
        assert_eq!(retry.error, -4);
    }

    #[tokio::test]
    async fn second_complete_is_already_paid_and_does_not_extend_again() {
        let s = setup().await;
        let id = pending(&s).await;
        s.handler.handle(callback(id, "67000", "1", "0")).await;
        let end_after_first = s
            .fixture
            .subscriptions
            .find_by_user(s.user)
            .await
            .unwrap()
            .unwrap()
            .end_date;

        let response = s.handler.handle(callback(id, "67000", "1", "0")).await;

        assert_eq!(response.error, -4);
        let sub = s.fixture.subscriptions.find_by_user(s.user).await.unwrap().unwrap();
        assert_eq!(sub.end_date, end_after_first);
    }

    #[tokio::test]
    async fn click_error_marks_payment_failed() {
        let s = setup().await;
        let id = pending(&s).await;

        let response = s.handler.handle(callback(id, "67000", "1", "-5017")).await;

        assert_eq!(response.error, -9);
        assert_eq!(response.error_note, "Transaction cancelled");
        assert_eq!(s.fixture.payments.all()[0].status, PaymentStatus::Failed);
        assert!(s.fixture.subscriptions.find_by_user(s.user).await.unwrap().is_none());

        let retry = s.handler.handle(callback(id, "67000", "1", "0")).await;
        assert_eq!(retry.error, -9);
    }

    #[tokio::test]
    async fn failed_payment_counts_against_linked_subscription() {
        let s = setup().await;
        let now = Timestamp::now();
        let sub = NewSubscription::first_period(s.user, price(), 30, now)
            .into_subscription(SubscriptionId::new(60));
        s.fixture.subscriptions.insert(sub);
        let payment = s
            .fixture
            .payments
            .create(NewPayment::automatic(s.user, SubscriptionId::new(60), price(), 1, now))
            .await
            .unwrap();

        s.handler
            .handle(callback(payment.id.as_i64(), "67000", "1", "-1"))
            .await;

        let stored = s.fixture.subscriptions.find_by_user(s.user).await.unwrap().unwrap();
        assert_eq!(stored.failed_payment_count, 1);
        assert!(stored.is_active);
    }

    #[tokio::test]
    async fn amount_mismatch_on_complete_mutates_nothing() {
        let s = setup().await;
        let id = pending(&s).await;
        let before = s.fixture.payments.all();

        let response = s.handler.handle(callback(id, "50000", "1", "0")).await;

        assert_eq!(response.error, -2);
        assert_eq!(s.fixture.payments.all(), before);
        assert!(s.fixture.subscriptions.find_by_user(s.user).await.unwrap().is_none());
    }
}
