//! HTTP handlers for billing endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::adapters::http::error::api_error;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::billing::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CreatePaymentCommand,
    CreatePaymentHandler, GetSubscriptionHandler, GetSubscriptionQuery, PaymentHistoryHandler,
    PaymentHistoryQuery, RemoveCardCommand, RemoveCardHandler, SaveCardCommand, SaveCardHandler,
    SetAutoRenewCommand, SetAutoRenewHandler,
};
use crate::domain::billing::{BillingError, Subscription};

use super::dto::{
    AutoRenewRequest, CardResponse, CheckoutResponse, PaymentResponse, SaveCardRequest,
    SubscriptionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BillingHandlers {
    pub create_payment: Arc<CreatePaymentHandler>,
    pub subscription: Arc<GetSubscriptionHandler>,
    pub cancel: Arc<CancelSubscriptionHandler>,
    pub auto_renew: Arc<SetAutoRenewHandler>,
    pub history: Arc<PaymentHistoryHandler>,
    pub save_card: Arc<SaveCardHandler>,
    pub remove_card: Arc<RemoveCardHandler>,
    /// Recorded when the Mini App does not report a card type.
    pub default_card_type: String,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/subscription
pub async fn get_subscription(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<SubscriptionResponse>, BillingApiError> {
    let overview = handlers
        .subscription
        .handle(GetSubscriptionQuery { user_id: user.id })
        .await?;
    Ok(Json(overview.into()))
}

/// POST /api/subscription/cancel
pub async fn cancel_subscription(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Subscription>, BillingApiError> {
    let subscription = handlers
        .cancel
        .handle(CancelSubscriptionCommand { user_id: user.id })
        .await?;
    Ok(Json(subscription))
}

/// POST /api/subscription/auto-renew
pub async fn set_auto_renew(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AutoRenewRequest>,
) -> Result<Json<Subscription>, BillingApiError> {
    let subscription = handlers
        .auto_renew
        .handle(SetAutoRenewCommand {
            user_id: user.id,
            enabled: req.enabled,
        })
        .await?;
    Ok(Json(subscription))
}

/// GET /api/payments - Payment history, newest first
pub async fn payment_history(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<PaymentResponse>>, BillingApiError> {
    let payments = handlers
        .history
        .handle(PaymentHistoryQuery { user_id: user.id })
        .await?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// POST /api/payments - Start a Click checkout for one period
pub async fn create_payment(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<(StatusCode, Json<CheckoutResponse>), BillingApiError> {
    let result = handlers
        .create_payment
        .handle(CreatePaymentCommand { user_id: user.id })
        .await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /api/payments/card
pub async fn save_card(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SaveCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), BillingApiError> {
    let method = handlers
        .save_card
        .handle(SaveCardCommand {
            user_id: user.id,
            card_token: req.card_token,
            card_number: req.card_number,
            card_type: req.card_type.unwrap_or_else(|| handlers.default_card_type.clone()),
            expiry_month: req.expiry_month,
            expiry_year: req.expiry_year,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(method.into())))
}

/// DELETE /api/payments/card
pub async fn remove_card(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode, BillingApiError> {
    handlers
        .remove_card
        .handle(RemoveCardCommand { user_id: user.id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

api_error!(BillingApiError, BillingError);
