//! Click payment gateway adapter.
//!
//! Outbound calls only. Callback signatures (MD5 over the callback fields and
//! the shared secret) are checked in the domain, see `ClickCallback::verify_sign`.

mod client;

pub use client::ClickPaymentGateway;
