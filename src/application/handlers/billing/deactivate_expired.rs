//! DeactivateExpiredHandler - closes premium for lapsed subscriptions.

use std::sync::Arc;

use super::notify_user;
use crate::domain::billing::{notice, BillingError, BillingPolicy};
use crate::domain::foundation::Timestamp;
use crate::ports::{Notifier, ProfileRepository, SubscriptionRepository};

#[derive(Debug, Clone, Copy)]
pub struct DeactivateExpiredCommand {
    pub now: Timestamp,
}

pub struct DeactivateExpiredHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    profiles: Arc<dyn ProfileRepository>,
    notifier: Arc<dyn Notifier>,
    policy: BillingPolicy,
}

impl DeactivateExpiredHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        profiles: Arc<dyn ProfileRepository>,
        notifier: Arc<dyn Notifier>,
        policy: BillingPolicy,
    ) -> Self {
        Self {
            subscriptions,
            profiles,
            notifier,
            policy,
        }
    }

    /// Returns how many subscriptions were switched off.
    ///
    /// Subscriptions still inside their auto-renew retry window are left for
    /// the renewal job to settle.
    pub async fn handle(&self, cmd: DeactivateExpiredCommand) -> Result<usize, BillingError> {
        let mut deactivated = 0;

        for mut subscription in self.subscriptions.list_active().await? {
            if !subscription.is_expired(cmd.now) || subscription.is_awaiting_retry(&self.policy) {
                continue;
            }
            subscription.deactivate(cmd.now);
            if let Err(err) = self.subscriptions.update(&subscription).await {
                tracing::error!(subscription_id = %subscription.id, error = %err, "failed to deactivate subscription");
                continue;
            }
            notify_user(
                self.profiles.as_ref(),
                self.notifier.as_ref(),
                subscription.user_id,
                notice::subscription_expired(),
            )
            .await;
            deactivated += 1;
        }

        tracing::info!(deactivated, "expired subscriptions swept");
        Ok(deactivated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{price, BillingFixture};
    use super::*;
    use crate::domain::billing::NewSubscription;
    use crate::domain::foundation::SubscriptionId;

    #[tokio::test]
    async fn lapsed_subscriptions_close_unless_a_retry_is_pending() {
        let fixture = BillingFixture::new();
        let now = Timestamp::now();
        let (lapsed, lapsed_chat) = fixture.user(1).await;
        let (retrying, _) = fixture.user(2).await;
        let (current, _) = fixture.user(3).await;

        for (id, user, days) in [(1, lapsed, -1), (2, retrying, -1), (3, current, 4)] {
            let mut sub = NewSubscription::first_period(user, price(), 30, now.add_days(-30))
                .into_subscription(SubscriptionId::new(id));
            sub.end_date = Some(now.add_days(days));
            if user == retrying {
                sub.record_failed_payment(3, now.add_hours(-2));
            }
            fixture.subscriptions.insert(sub);
        }
        let handler = DeactivateExpiredHandler::new(
            fixture.subscriptions.clone(),
            fixture.profiles.clone(),
            fixture.notifier.clone(),
            BillingPolicy::default(),
        );

        let count = handler.handle(DeactivateExpiredCommand { now }).await.unwrap();

        assert_eq!(count, 1);
        let find = |user| {
            let subs = fixture.subscriptions.clone();
            async move { subs.find_by_user(user).await.unwrap().unwrap() }
        };
        assert!(!find(lapsed).await.is_active);
        assert!(find(retrying).await.is_active);
        assert!(find(current).await.is_active);
        assert!(fixture.notifier.texts_to(lapsed_chat)[0].contains("has ended"));
    }
}
