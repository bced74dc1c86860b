//! Subscription pricing and renewal job configuration

use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::billing::{
    BillingPolicy, DEFAULT_MAX_PAYMENT_ATTEMPTS, DEFAULT_MONTHLY_PRICE_UZS, DEFAULT_PERIOD_DAYS,
    DEFAULT_REMINDER_DAYS, DEFAULT_RETRY_INTERVAL_HOURS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Monthly price in UZS
    #[serde(default = "default_monthly_price")]
    pub monthly_price: i64,

    #[serde(default = "default_period_days")]
    pub period_days: i64,

    #[serde(default = "default_max_attempts")]
    pub max_payment_attempts: i32,

    #[serde(default = "default_retry_hours")]
    pub retry_interval_hours: i64,

    #[serde(default = "default_reminder_days")]
    pub reminder_days: i64,

    /// Run renewals, reminders and the expiry sweep in-process
    #[serde(default)]
    pub renewal_job_enabled: bool,

    #[serde(default = "default_job_interval")]
    pub renewal_job_interval_secs: u64,
}

impl SubscriptionConfig {
    pub fn policy(&self) -> BillingPolicy {
        BillingPolicy {
            monthly_price: Decimal::new(self.monthly_price * 100, 2),
            period_days: self.period_days,
            max_payment_attempts: self.max_payment_attempts,
            retry_interval_hours: self.retry_interval_hours,
            reminder_days: self.reminder_days,
        }
    }

    pub fn job_interval(&self) -> Duration {
        Duration::from_secs(self.renewal_job_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.monthly_price <= 0 {
            return Err(ValidationError::InvalidSubscription("monthly_price"));
        }
        if self.period_days <= 0 {
            return Err(ValidationError::InvalidSubscription("period_days"));
        }
        if self.max_payment_attempts <= 0 {
            return Err(ValidationError::InvalidSubscription("max_payment_attempts"));
        }
        if self.retry_interval_hours <= 0 {
            return Err(ValidationError::InvalidSubscription("retry_interval_hours"));
        }
        if self.reminder_days < 0 {
            return Err(ValidationError::InvalidSubscription("reminder_days"));
        }
        if self.renewal_job_interval_secs < 60 {
            return Err(ValidationError::InvalidSubscription("renewal_job_interval_secs"));
        }
        Ok(())
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            monthly_price: default_monthly_price(),
            period_days: default_period_days(),
            max_payment_attempts: default_max_attempts(),
            retry_interval_hours: default_retry_hours(),
            reminder_days: default_reminder_days(),
            renewal_job_enabled: false,
            renewal_job_interval_secs: default_job_interval(),
        }
    }
}

fn default_monthly_price() -> i64 {
    DEFAULT_MONTHLY_PRICE_UZS
}

fn default_period_days() -> i64 {
    DEFAULT_PERIOD_DAYS
}

fn default_max_attempts() -> i32 {
    DEFAULT_MAX_PAYMENT_ATTEMPTS
}

fn default_retry_hours() -> i64 {
    DEFAULT_RETRY_INTERVAL_HOURS
}

fn default_reminder_days() -> i64 {
    DEFAULT_REMINDER_DAYS
}

fn default_job_interval() -> u64 {
    60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_domain_defaults() {
        let config = SubscriptionConfig::default();
        assert_eq!(config.policy(), BillingPolicy::default());
        assert!(!config.renewal_job_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_price() {
        let config = SubscriptionConfig {
            monthly_price: 99_000,
            ..Default::default()
        };
        assert_eq!(config.policy().monthly_price, Decimal::from(99_000));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let config = SubscriptionConfig {
            max_payment_attempts: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidSubscription("max_payment_attempts"))
        );
    }
}
