//! Pricing and renewal knobs shared by the billing flows.

use rust_decimal::Decimal;

/// Default monthly price in UZS.
pub const DEFAULT_MONTHLY_PRICE_UZS: i64 = 67_000;

/// Days added to a subscription per successful payment.
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Consecutive failed payments after which a subscription is switched off.
pub const DEFAULT_MAX_PAYMENT_ATTEMPTS: i32 = 3;

/// Minimum spacing between automatic charge attempts.
pub const DEFAULT_RETRY_INTERVAL_HOURS: i64 = 24;

/// How many days ahead of the end date the reminder goes out.
pub const DEFAULT_REMINDER_DAYS: i64 = 3;

/// Renewal window: subscriptions ending within this many days get charged.
pub const RENEWAL_WINDOW_DAYS: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPolicy {
    pub monthly_price: Decimal,
    pub period_days: i64,
    pub max_payment_attempts: i32,
    pub retry_interval_hours: i64,
    pub reminder_days: i64,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            monthly_price: Decimal::new(DEFAULT_MONTHLY_PRICE_UZS * 100, 2),
            period_days: DEFAULT_PERIOD_DAYS,
            max_payment_attempts: DEFAULT_MAX_PAYMENT_ATTEMPTS,
            retry_interval_hours: DEFAULT_RETRY_INTERVAL_HOURS,
            reminder_days: DEFAULT_REMINDER_DAYS,
        }
    }
}
