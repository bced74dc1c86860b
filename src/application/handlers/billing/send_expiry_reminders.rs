//! SendExpiryRemindersHandler - heads-up a few days before premium ends.

use std::sync::Arc;

use super::notify_user;
use crate::domain::billing::{notice, BillingError, BillingPolicy};
use crate::domain::foundation::Timestamp;
use crate::ports::{Notifier, ProfileRepository, SubscriptionRepository};

#[derive(Debug, Clone, Copy)]
pub struct SendExpiryRemindersCommand {
    pub now: Timestamp,
}

pub struct SendExpiryRemindersHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    profiles: Arc<dyn ProfileRepository>,
    notifier: Arc<dyn Notifier>,
    policy: BillingPolicy,
}

impl SendExpiryRemindersHandler {
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

    /// Returns how many reminders went out. Matches on the calendar date only,
    /// so a daily run reminds each subscription once.
    pub async fn handle(&self, cmd: SendExpiryRemindersCommand) -> Result<usize, BillingError> {
        let target = cmd.now.add_days(self.policy.reminder_days).date();
        let mut sent = 0;

        for subscription in self.subscriptions.list_active().await? {
            let Some(end) = subscription.end_date else {
                continue;
            };
            if !subscription.ends_on(target) {
                continue;
            }
            notify_user(
                self.profiles.as_ref(),
                self.notifier.as_ref(),
                subscription.user_id,
                notice::expiry_reminder(self.policy.reminder_days, end, subscription.auto_renew),
            )
            .await;
            sent += 1;
        }

        tracing::info!(sent, %target, "expiry reminders sent");
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{price, BillingFixture};
    use super::*;
    use crate::domain::billing::NewSubscription;
    use crate::domain::foundation::SubscriptionId;

    #[tokio::test]
    async fn reminds_only_subscriptions_ending_on_the_target_day() {
        let fixture = BillingFixture::new();
        let now = Timestamp::now();
        let (due, due_chat) = fixture.user(1).await;
        let (later, later_chat) = fixture.user(2).await;
        let (cancelled, cancelled_chat) = fixture.user(3).await;

        for (id, user, days, active) in [(1, due, 3, true), (2, later, 5, true), (3, cancelled, 3, false)] {
            let mut sub = NewSubscription::first_period(user, price(), 30, now)
                .into_subscription(SubscriptionId::new(id));
            sub.end_date = Some(now.add_days(days));
            sub.is_active = active;
            fixture.subscriptions.insert(sub);
        }
        let handler = SendExpiryRemindersHandler::new(
            fixture.subscriptions.clone(),
            fixture.profiles.clone(),
            fixture.notifier.clone(),
            BillingPolicy::default(),
        );

        let sent = handler
            .handle(SendExpiryRemindersCommand { now })
            .await
            .unwrap();

        assert_eq!(sent, 1);
        let texts = fixture.notifier.texts_to(due_chat);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("3 days"));
        assert!(texts[0].contains("Auto-renewal is on"));
        assert!(fixture.notifier.texts_to(later_chat).is_empty());
        assert!(fixture.notifier.texts_to(cancelled_chat).is_empty());
    }
}
