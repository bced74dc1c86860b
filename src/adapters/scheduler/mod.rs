//! Background jobs.

mod billing_scheduler;

pub use billing_scheduler::{BillingScheduler, TickReport};
