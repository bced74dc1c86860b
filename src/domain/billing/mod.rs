//! Billing module - subscriptions, payments and the Click gateway protocol.
//!
//! # Subscription lifecycle
//!
//! ```text
//! first payment ──► active ──(payment)──► end date + period
//!                     │
//!                     ├──(3 failed charges)──► inactive, auto-renew off
//!                     ├──(end date passes)──► inactive
//!                     └──(cancel)──► inactive, no end date
//! ```

mod click;
mod errors;
pub mod notice;
mod payment;
mod payment_method;
mod policy;
mod subscription;

pub use click::{compute_sign, ClickAction, ClickCallback, ClickErrorCode, ClickResponse};
pub use errors::BillingError;
pub use payment::{NewPayment, Payment, PaymentStatus};
pub use payment_method::{CardDetails, PaymentMethod};
pub use policy::{
    BillingPolicy, DEFAULT_MAX_PAYMENT_ATTEMPTS, DEFAULT_MONTHLY_PRICE_UZS, DEFAULT_PERIOD_DAYS,
    DEFAULT_REMINDER_DAYS, DEFAULT_RETRY_INTERVAL_HOURS, RENEWAL_WINDOW_DAYS,
};
pub use subscription::{FailureOutcome, NewSubscription, Subscription};
