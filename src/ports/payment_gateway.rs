//! Payment gateway port for outbound calls to the payment provider.
//!
//! Inbound prepare/complete callbacks are handled by the application layer;
//! this port covers the two requests we initiate: creating an invoice for a
//! Mini App checkout and charging a stored card token.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted invoice the user pays in the gateway UI.
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, PaymentError>;

    /// Charge a stored card token without user interaction.
    ///
    /// A declined charge is `Ok` with `approved = false`; `Err` is reserved
    /// for transport and protocol failures.
    async fn charge_card(&self, request: ChargeRequest) -> Result<ChargeOutcome, PaymentError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRequest {
    pub payment_id: PaymentId,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: Option<String>,
    pub payment_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub payment_id: PaymentId,
    pub amount: Decimal,
    pub card_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeOutcome {
    pub approved: bool,
    pub click_trans_id: Option<String>,
    pub error_code: i32,
    pub error_note: String,
    /// Provider response as received, stored on the payment.
    pub raw: serde_json::Value,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    /// Provider's error code (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Rejected, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.provider_code {
            Some(provider) => write!(f, "{} ({}): {}", self.code, provider, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(ErrorCode::GatewayError, err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Provider unreachable or timed out.
    NetworkError,
    /// Provider answered with an error code.
    Rejected,
    /// Provider answered with something we could not interpret.
    InvalidResponse,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::Rejected => "rejected",
            PaymentErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}
