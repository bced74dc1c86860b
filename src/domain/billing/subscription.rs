//! Subscription aggregate.
//!
//! A user has at most one subscription. Paid access lasts until `end_date`;
//! each successful payment pushes the end date forward by one period.
//!
//! # Invariants
//!
//! - `end_date` only moves forward. The single exception is [`Subscription::cancel`],
//!   which clears it together with `is_active` and `auto_renew`.
//! - `failed_payment_count` counts consecutive failures and is reset by a
//!   successful automatic payment.
//! - Reaching the attempt limit switches off both `is_active` and `auto_renew`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::policy::{BillingPolicy, RENEWAL_WINDOW_DAYS};
use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_active: bool,
    pub auto_renew: bool,
    pub price: Decimal,
    pub failed_payment_count: i32,
    pub last_failed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert data for a subscription created by its first payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub user_id: UserId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub price: Decimal,
    pub auto_renew: bool,
}

impl NewSubscription {
    /// One period starting at `now`.
    pub fn first_period(user_id: UserId, price: Decimal, period_days: i64, now: Timestamp) -> Self {
        Self {
            user_id,
            start_date: now,
            end_date: now.add_days(period_days),
            price,
            auto_renew: true,
        }
    }

    pub fn into_subscription(self, id: SubscriptionId) -> Subscription {
        Subscription {
            id,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: Some(self.end_date),
            is_active: true,
            auto_renew: self.auto_renew,
            price: self.price,
            failed_payment_count: 0,
            last_failed_at: None,
            created_at: self.start_date,
            updated_at: self.start_date,
        }
    }
}

/// What a recorded failure did to the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Another attempt will be made; `attempt` is the failure just recorded.
    WillRetry { attempt: i32, max_attempts: i32 },
    /// The attempt limit was reached and the subscription is now off.
    Deactivated { attempts: i32 },
}

impl Subscription {
    /// Pushes the end date forward by `period_days` from whichever is later,
    /// now or the current end. Never moves it backward.
    pub fn extend(&mut self, period_days: i64, now: Timestamp) {
        let base = match self.end_date {
            Some(end) if end.is_after(&now) => end,
            _ => now,
        };
        self.end_date = Some(base.add_days(period_days));
        self.is_active = true;
        self.updated_at = now;
    }

    pub fn record_failed_payment(&mut self, max_attempts: i32, now: Timestamp) -> FailureOutcome {
        self.failed_payment_count += 1;
        self.last_failed_at = Some(now);
        self.updated_at = now;

        if self.failed_payment_count >= max_attempts {
            self.is_active = false;
            self.auto_renew = false;
            FailureOutcome::Deactivated {
                attempts: self.failed_payment_count,
            }
        } else {
            FailureOutcome::WillRetry {
                attempt: self.failed_payment_count,
                max_attempts,
            }
        }
    }

    pub fn reset_failures(&mut self, now: Timestamp) {
        self.failed_payment_count = 0;
        self.last_failed_at = None;
        self.updated_at = now;
    }

    pub fn cancel(&mut self, now: Timestamp) {
        self.is_active = false;
        self.auto_renew = false;
        self.end_date = None;
        self.updated_at = now;
    }

    pub fn set_auto_renew(&mut self, enabled: bool, now: Timestamp) {
        self.auto_renew = enabled;
        self.updated_at = now;
    }

    /// Switches access off without touching the end date.
    pub fn deactivate(&mut self, now: Timestamp) {
        self.is_active = false;
        self.updated_at = now;
    }

    /// Whole days left, zero once inactive or past the end date.
    pub fn days_remaining(&self, now: Timestamp) -> i64 {
        if !self.is_active {
            return 0;
        }
        match self.end_date {
            Some(end) => end.duration_since(&now).num_days().max(0),
            None => 0,
        }
    }

    pub fn has_access(&self, now: Timestamp) -> bool {
        self.is_active && self.end_date.map_or(false, |end| end.is_after(&now))
    }

    /// Active but past its end date.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.is_active && self.end_date.map_or(false, |end| end.is_before(&now))
    }

    /// Auto-renew is on and some, but not all, attempts have failed.
    pub fn is_awaiting_retry(&self, policy: &BillingPolicy) -> bool {
        self.auto_renew
            && self.failed_payment_count > 0
            && self.failed_payment_count < policy.max_payment_attempts
    }

    /// True when the renewal job should try to charge this subscription now.
    pub fn is_due_for_renewal(&self, policy: &BillingPolicy, now: Timestamp) -> bool {
        if !self.is_active || !self.auto_renew {
            return false;
        }
        if self.failed_payment_count >= policy.max_payment_attempts {
            return false;
        }
        let Some(end) = self.end_date else {
            return false;
        };
        if end.is_after(&now.add_days(RENEWAL_WINDOW_DAYS)) {
            return false;
        }
        match self.last_failed_at {
            Some(failed_at) if self.failed_payment_count > 0 => {
                !failed_at.add_hours(policy.retry_interval_hours).is_after(&now)
            }
            _ => true,
        }
    }

    pub fn ends_on(&self, date: NaiveDate) -> bool {
        self.end_date.map_or(false, |end| end.date() == date)
    }
}
