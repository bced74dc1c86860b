//! GetSubscriptionHandler - data for the subscription page.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::billing::{BillingError, BillingPolicy, PaymentMethod, Subscription};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{ActivityLog, PaymentMethodRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub user_id: UserId,
}

/// Subscription state plus what the page needs to offer a purchase.
#[derive(Debug, Clone)]
pub struct SubscriptionOverview {
    pub subscription: Option<Subscription>,
    pub has_access: bool,
    pub days_remaining: i64,
    /// Active card on file, if any.
    pub card: Option<PaymentMethod>,
    pub monthly_price: Decimal,
}

pub struct GetSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    methods: Arc<dyn PaymentMethodRepository>,
    activity: Arc<dyn ActivityLog>,
    policy: BillingPolicy,
}

impl GetSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        methods: Arc<dyn PaymentMethodRepository>,
        activity: Arc<dyn ActivityLog>,
        policy: BillingPolicy,
    ) -> Self {
        Self {
            subscriptions,
            methods,
            activity,
            policy,
        }
    }

    pub async fn handle(&self, query: GetSubscriptionQuery) -> Result<SubscriptionOverview, BillingError> {
        let now = Timestamp::now();
        let subscription = self.subscriptions.find_by_user(query.user_id).await?;
        let card = self
            .methods
            .find_by_user(query.user_id)
            .await?
            .filter(|m| m.is_active);

        record_activity(
            self.activity.as_ref(),
            UserActivity::bare(query.user_id, ActivityKind::SubscriptionPageViewed),
        )
        .await;

        Ok(SubscriptionOverview {
            has_access: subscription.as_ref().map_or(false, |s| s.has_access(now)),
            days_remaining: subscription.as_ref().map_or(0, |s| s.days_remaining(now)),
            subscription,
            card,
            monthly_price: self.policy.monthly_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{price, BillingFixture};
    use super::*;
    use crate::domain::billing::NewSubscription;
    use crate::domain::foundation::SubscriptionId;

    fn handler(fixture: &BillingFixture) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(
            fixture.subscriptions.clone(),
            fixture.methods.clone(),
            fixture.activity.clone(),
            BillingPolicy::default(),
        )
    }

    #[tokio::test]
    async fn user_without_subscription_sees_price_only() {
        let fixture = BillingFixture::new();
        let (user, _) = fixture.user(5).await;

        let overview = handler(&fixture)
            .handle(GetSubscriptionQuery { user_id: user })
            .await
            .unwrap();

        assert!(overview.subscription.is_none());
        assert!(!overview.has_access);
        assert_eq!(overview.days_remaining, 0);
        assert_eq!(overview.monthly_price, price());
        assert_eq!(
            fixture.activity.kinds_for(user),
            vec![ActivityKind::SubscriptionPageViewed]
        );
    }

    #[tokio::test]
    async fn active_subscription_reports_days_left() {
        let fixture = BillingFixture::new();
        let (user, _) = fixture.user(5).await;
        let now = Timestamp::now();
        let mut sub = NewSubscription::first_period(user, price(), 30, now)
            .into_subscription(SubscriptionId::new(1));
        sub.end_date = Some(now.add_days(10).add_hours(1));
        fixture.subscriptions.insert(sub);

        let overview = handler(&fixture)
            .handle(GetSubscriptionQuery { user_id: user })
            .await
            .unwrap();

        assert!(overview.has_access);
        assert_eq!(overview.days_remaining, 10);
        assert!(overview.card.is_none());
    }
}
