//! HTTP adapter for subscriptions, payments and stored cards.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AutoRenewRequest, CardResponse, CheckoutResponse, PaymentResponse, SaveCardRequest,
    SubscriptionResponse,
};
pub use handlers::{BillingApiError, BillingHandlers};
pub use routes::billing_routes;
