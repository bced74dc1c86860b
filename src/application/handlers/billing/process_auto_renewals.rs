//! ProcessAutoRenewalsHandler - charges stored cards for subscriptions about
//! to end.
//!
//! A subscription gets at most `max_payment_attempts` consecutive failed
//! charges, spaced `retry_interval_hours` apart. The last failure switches it
//! off.

use std::sync::Arc;

use super::notify_user;
use crate::domain::billing::{
    notice, BillingError, BillingPolicy, FailureOutcome, NewPayment, Payment, Subscription,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{
    ChargeRequest, Notifier, PaymentGateway, PaymentMethodRepository, PaymentRepository,
    ProfileRepository, SubscriptionRepository,
};

#[derive(Debug, Clone, Copy)]
pub struct ProcessAutoRenewalsCommand {
    pub now: Timestamp,
}

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenewalReport {
    pub renewed: usize,
    pub failed: usize,
    /// Subscriptions switched off by this run's failure.
    pub deactivated: usize,
    pub card_expired: usize,
    /// Due but without an active card; auto-renew is switched off.
    pub skipped: usize,
    pub errors: usize,
}

enum Attempt {
    Renewed,
    Failed,
    Deactivated,
    CardExpired,
    NoCard,
}

pub struct ProcessAutoRenewalsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    methods: Arc<dyn PaymentMethodRepository>,
    payments: Arc<dyn PaymentRepository>,
    profiles: Arc<dyn ProfileRepository>,
    notifier: Arc<dyn Notifier>,
    gateway: Arc<dyn PaymentGateway>,
    policy: BillingPolicy,
}

impl ProcessAutoRenewalsHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        methods: Arc<dyn PaymentMethodRepository>,
        payments: Arc<dyn PaymentRepository>,
        profiles: Arc<dyn ProfileRepository>,
        notifier: Arc<dyn Notifier>,
        gateway: Arc<dyn PaymentGateway>,
        policy: BillingPolicy,
    ) -> Self {
        Self {
            subscriptions,
            methods,
            payments,
            profiles,
            notifier,
            gateway,
            policy,
        }
    }

    pub async fn handle(&self, cmd: ProcessAutoRenewalsCommand) -> Result<RenewalReport, BillingError> {
        let mut report = RenewalReport::default();
        let due: Vec<Subscription> = self
            .subscriptions
            .list_active()
            .await?
            .into_iter()
            .filter(|s| s.is_due_for_renewal(&self.policy, cmd.now))
            .collect();

        for subscription in due {
            let id = subscription.id;
            match self.renew(subscription, cmd.now).await {
                Ok(Attempt::Renewed) => report.renewed += 1,
                Ok(Attempt::Failed) => report.failed += 1,
                Ok(Attempt::Deactivated) => {
                    report.failed += 1;
                    report.deactivated += 1;
                }
                Ok(Attempt::CardExpired) => report.card_expired += 1,
                Ok(Attempt::NoCard) => report.skipped += 1,
                Err(err) => {
                    tracing::error!(subscription_id = %id, error = %err, "auto-renewal failed");
                    report.errors += 1;
                }
            }
        }

        tracing::info!(
            renewed = report.renewed,
            failed = report.failed,
            deactivated = report.deactivated,
            card_expired = report.card_expired,
            skipped = report.skipped,
            errors = report.errors,
            "auto-renewal run finished"
        );
        Ok(report)
    }

    async fn renew(&self, mut subscription: Subscription, now: Timestamp) -> Result<Attempt, BillingError> {
        // 1. Card on file
        let Some(card) = self
            .methods
            .find_by_user(subscription.user_id)
            .await?
            .filter(|m| m.is_active)
        else {
            // Without a card the subscription runs out at its end date.
            subscription.set_auto_renew(false, now);
            self.subscriptions.update(&subscription).await?;
            tracing::warn!(subscription_id = %subscription.id, "no usable card, auto-renew switched off");
            return Ok(Attempt::NoCard);
        };

        if card.is_expired(now) {
            notify_user(
                self.profiles.as_ref(),
                self.notifier.as_ref(),
                subscription.user_id,
                notice::card_expired(&card.card_last_four),
            )
            .await;
            subscription.deactivate(now);
            subscription.set_auto_renew(false, now);
            self.subscriptions.update(&subscription).await?;
            tracing::warn!(subscription_id = %subscription.id, "stored card expired, subscription switched off");
            return Ok(Attempt::CardExpired);
        }

        // 2. Pending automatic payment for this attempt
        let attempt = subscription.failed_payment_count + 1;
        let mut payment = self
            .payments
            .create(NewPayment::automatic(
                subscription.user_id,
                subscription.id,
                subscription.price,
                attempt,
                now,
            ))
            .await?;

        // 3. Charge
        let charge = self
            .gateway
            .charge_card(ChargeRequest {
                payment_id: payment.id,
                amount: payment.amount,
                card_token: card.card_token.clone(),
            })
            .await;

        match charge {
            Ok(outcome) if outcome.approved => {
                payment.complete(outcome.click_trans_id.clone(), outcome.raw, now)?;
                payment.click_trans_id = outcome.click_trans_id;
                self.payments.update(&payment).await?;

                subscription.extend(self.policy.period_days, now);
                subscription.reset_failures(now);
                self.subscriptions.update(&subscription).await?;

                notify_user(
                    self.profiles.as_ref(),
                    self.notifier.as_ref(),
                    subscription.user_id,
                    notice::auto_renewal_succeeded(payment.amount, subscription.end_date),
                )
                .await;
                tracing::info!(subscription_id = %subscription.id, payment_id = %payment.id, "subscription renewed");
                Ok(Attempt::Renewed)
            }
            Ok(outcome) => {
                tracing::warn!(
                    subscription_id = %subscription.id,
                    error_code = outcome.error_code,
                    error_note = %outcome.error_note,
                    "card charge declined"
                );
                self.record_failure(subscription, payment, outcome.raw, now).await
            }
            Err(err) => {
                tracing::warn!(subscription_id = %subscription.id, error = %err, "card charge did not go through");
                let detail = serde_json::json!({ "error": err.to_string() });
                self.record_failure(subscription, payment, detail, now).await
            }
        }
    }

    async fn record_failure(
        &self,
        mut subscription: Subscription,
        mut payment: Payment,
        detail: serde_json::Value,
        now: Timestamp,
    ) -> Result<Attempt, BillingError> {
        payment.fail(detail, now)?;
        self.payments.update(&payment).await?;

        let outcome = subscription.record_failed_payment(self.policy.max_payment_attempts, now);
        self.subscriptions.update(&subscription).await?;

        let (text, attempt) = match outcome {
            FailureOutcome::WillRetry {
                attempt,
                max_attempts,
            } => (
                notice::auto_renewal_failed(attempt, max_attempts, self.policy.retry_interval_hours),
                Attempt::Failed,
            ),
            FailureOutcome::Deactivated { attempts } => (
                notice::subscription_cancelled_after_failures(attempts),
                Attempt::Deactivated,
            ),
        };
        notify_user(
            self.profiles.as_ref(),
            self.notifier.as_ref(),
            subscription.user_id,
            text,
        )
        .await;
        Ok(attempt)
    }
}
