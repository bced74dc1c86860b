//! Cancel and auto-renew toggling.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Subscription};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{PaymentMethodRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub user_id: UserId,
}

/// Ends premium immediately: inactive, no auto-renew, end date cleared.
pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl CancelSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(&self, cmd: CancelSubscriptionCommand) -> Result<Subscription, BillingError> {
        let mut subscription = self
            .subscriptions
            .find_by_user(cmd.user_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(cmd.user_id))?;

        subscription.cancel(Timestamp::now());
        self.subscriptions.update(&subscription).await?;

        tracing::info!(user_id = %cmd.user_id, subscription_id = %subscription.id, "subscription cancelled");
        Ok(subscription)
    }
}

#[derive(Debug, Clone)]
pub struct SetAutoRenewCommand {
    pub user_id: UserId,
    pub enabled: bool,
}

pub struct SetAutoRenewHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    methods: Arc<dyn PaymentMethodRepository>,
}

impl SetAutoRenewHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        methods: Arc<dyn PaymentMethodRepository>,
    ) -> Self {
        Self {
            subscriptions,
            methods,
        }
    }

    pub async fn handle(&self, cmd: SetAutoRenewCommand) -> Result<Subscription, BillingError> {
        let now = Timestamp::now();
        let mut subscription = self
            .subscriptions
            .find_by_user(cmd.user_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(cmd.user_id))?;

        // Renewals charge the stored card, so turning them on needs one.
        if cmd.enabled {
            let usable = self
                .methods
                .find_by_user(cmd.user_id)
                .await?
                .map_or(false, |m| m.is_usable(now));
            if !usable {
                return Err(BillingError::validation(
                    "auto_renew",
                    "Add a valid card before enabling auto-renewal",
                ));
            }
        }

        subscription.set_auto_renew(cmd.enabled, now);
        self.subscriptions.update(&subscription).await?;
        Ok(subscription)
    }
}
