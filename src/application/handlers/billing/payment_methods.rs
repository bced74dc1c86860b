//! Stored card handlers.
//!
//! A saved card switches auto-renew on for an existing subscription; removing
//! it switches auto-renew off.

use std::sync::Arc;

use crate::domain::billing::{BillingError, CardDetails, PaymentMethod};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{PaymentMethodRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct SaveCardCommand {
    pub user_id: UserId,
    pub card_token: String,
    pub card_number: String,
    pub card_type: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
}

pub struct SaveCardHandler {
    methods: Arc<dyn PaymentMethodRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SaveCardHandler {
    pub fn new(
        methods: Arc<dyn PaymentMethodRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            methods,
            subscriptions,
        }
    }

    pub async fn handle(&self, cmd: SaveCardCommand) -> Result<PaymentMethod, BillingError> {
        let card = CardDetails::new(
            &cmd.card_token,
            &cmd.card_number,
            &cmd.card_type,
            cmd.expiry_month,
            cmd.expiry_year,
        )?;
        let now = Timestamp::now();
        if CardDetails::is_expired_at(card.expiry_month, card.expiry_year, now) {
            return Err(BillingError::validation("expiry_year", "Card has expired"));
        }

        let method = self.methods.upsert(cmd.user_id, card, now).await?;

        if let Some(mut subscription) = self.subscriptions.find_by_user(cmd.user_id).await? {
            if !subscription.auto_renew {
                subscription.set_auto_renew(true, now);
                self.subscriptions.update(&subscription).await?;
            }
        }

        tracing::info!(user_id = %cmd.user_id, card = %method.card_last_four, "card saved");
        Ok(method)
    }
}

#[derive(Debug, Clone)]
pub struct RemoveCardCommand {
    pub user_id: UserId,
}

pub struct RemoveCardHandler {
    methods: Arc<dyn PaymentMethodRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl RemoveCardHandler {
    pub fn new(
        methods: Arc<dyn PaymentMethodRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            methods,
            subscriptions,
        }
    }

    pub async fn handle(&self, cmd: RemoveCardCommand) -> Result<(), BillingError> {
        let mut method = self
            .methods
            .find_by_user(cmd.user_id)
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| BillingError::payment_method_not_found(cmd.user_id))?;
        let now = Timestamp::now();

        method.deactivate(now);
        self.methods.update(&method).await?;

        if let Some(mut subscription) = self.subscriptions.find_by_user(cmd.user_id).await? {
            if subscription.auto_renew {
                subscription.set_auto_renew(false, now);
                self.subscriptions.update(&subscription).await?;
            }
        }

        tracing::info!(user_id = %cmd.user_id, "card removed");
        Ok(())
    }
}
