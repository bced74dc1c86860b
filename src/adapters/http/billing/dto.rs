//! HTTP DTOs for billing endpoints.
//!
//! Card tokens are write-only: they are accepted from the Mini App but never
//! returned.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::{CreatePaymentResult, SubscriptionOverview};
use crate::domain::billing::{Payment, PaymentMethod, PaymentStatus, Subscription};
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct AutoRenewRequest {
    pub enabled: bool,
}

/// Card tokenized by Click in the Mini App.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveCardRequest {
    pub card_token: String,
    pub card_number: String,
    #[serde(default)]
    pub card_type: Option<String>,
    pub expiry_month: u32,
    pub expiry_year: i32,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub id: i64,
    pub card_last_four: String,
    pub card_type: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<PaymentMethod> for CardResponse {
    fn from(method: PaymentMethod) -> Self {
        Self {
            id: method.id.as_i64(),
            card_last_four: method.card_last_four,
            card_type: method.card_type,
            expiry_month: method.expiry_month,
            expiry_year: method.expiry_year,
            is_active: method.is_active,
            created_at: method.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub subscription: Option<Subscription>,
    pub has_access: bool,
    pub days_remaining: i64,
    pub card: Option<CardResponse>,
    pub monthly_price: Decimal,
}

impl From<SubscriptionOverview> for SubscriptionResponse {
    fn from(overview: SubscriptionOverview) -> Self {
        Self {
            subscription: overview.subscription,
            has_access: overview.has_access,
            days_remaining: overview.days_remaining,
            card: overview.card.map(Into::into),
            monthly_price: overview.monthly_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub is_auto_payment: bool,
    pub auto_payment_attempt: i32,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.as_i64(),
            amount: payment.amount,
            status: payment.status,
            is_auto_payment: payment.is_auto_payment,
            auto_payment_attempt: payment.auto_payment_attempt,
            created_at: payment.created_at,
            completed_at: payment.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub payment_id: i64,
    pub amount: Decimal,
    pub payment_url: String,
}

impl From<CreatePaymentResult> for CheckoutResponse {
    fn from(result: CreatePaymentResult) -> Self {
        Self {
            payment_id: result.payment.id.as_i64(),
            amount: result.payment.amount,
            payment_url: result.payment_url,
        }
    }
}
