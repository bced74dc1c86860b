//! HTTP routes for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_subscription, create_payment, get_subscription, payment_history, remove_card,
    save_card, set_auto_renew, BillingHandlers,
};

/// Subscription and payment routes, relative to `/api`. All require a session.
pub fn billing_routes(handlers: BillingHandlers) -> Router {
    Router::new()
        .route("/subscription", get(get_subscription))
        .route("/subscription/cancel", post(cancel_subscription))
        .route("/subscription/auto-renew", post(set_auto_renew))
        .route("/payments", get(payment_history).post(create_payment))
        .route("/payments/card", post(save_card).delete(remove_card))
        .with_state(handlers)
}
