//! Click merchant API client.
//!
//! Implements the `PaymentGateway` port over Click's JSON API:
//! - `POST {api_base}/v2/merchant/invoice/create` for Mini App checkouts
//! - `POST {api_base}/v2/card_token/payment` for charges against a stored token
//!
//! Inbound prepare/complete callbacks are not handled here; they arrive over
//! HTTP and are verified by the billing handlers.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::config::ClickConfig;
use crate::ports::{
    ChargeOutcome, ChargeRequest, Invoice, InvoiceRequest, PaymentError, PaymentGateway,
};

const CHECKOUT_URL: &str = "https://my.click.uz/services/pay";

pub struct ClickPaymentGateway {
    merchant_id: String,
    service_id: String,
    return_url: Option<String>,
    api_base_url: String,
    card_type: String,
    http_client: reqwest::Client,
}

impl ClickPaymentGateway {
    pub fn new(config: &ClickConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            merchant_id: config.merchant_id.clone(),
            service_id: config.service_id.clone(),
            return_url: config.return_url.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            card_type: config.card_type.clone(),
            http_client,
        })
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, PaymentError> {
        let url = format!("{}{}", self.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse Click response: {}", e))
        })?;

        if status.is_server_error() {
            tracing::error!(status = %status, body = %body, path, "Click API returned a server error");
            return Err(PaymentError::network(format!("Click API returned {}", status)));
        }

        Ok(body)
    }

    /// Hosted checkout link used when the invoice response carries none.
    fn checkout_url(&self, request: &InvoiceRequest) -> Result<String, PaymentError> {
        let mut url = url::Url::parse(CHECKOUT_URL)
            .map_err(|e| PaymentError::invalid_response(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("service_id", &self.service_id)
                .append_pair("merchant_id", &self.merchant_id)
                .append_pair("amount", &request.amount.normalize().to_string())
                .append_pair("transaction_param", &request.payment_id.to_string());
            if let Some(return_url) = &self.return_url {
                query.append_pair("return_url", return_url);
            }
        }
        Ok(url.into())
    }
}

fn amount_value(amount: Decimal) -> Result<Value, PaymentError> {
    amount
        .to_f64()
        .map(|a| json!(a))
        .ok_or_else(|| PaymentError::invalid_response(format!("Amount {} is not representable", amount)))
}

/// Click reports failures as `error` or `error_code`, either as a number or text.
fn error_code(body: &Value) -> Option<i32> {
    ["error", "error_code"].iter().find_map(|key| match body.get(*key)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_invoice(body: &Value) -> Result<(Option<String>, Option<String>), PaymentError> {
    match error_code(body) {
        Some(0) | None => Ok((text_field(body, "invoice_id"), text_field(body, "payment_url"))),
        Some(code) => Err(PaymentError::rejected(
            text_field(body, "error_note").unwrap_or_else(|| "Invoice rejected".to_string()),
        )
        .with_provider_code(code.to_string())),
    }
}

pub(crate) fn parse_charge(body: Value) -> Result<ChargeOutcome, PaymentError> {
    let code = error_code(&body)
        .ok_or_else(|| PaymentError::invalid_response("Charge response has no error code"))?;
    Ok(ChargeOutcome {
        approved: code == 0,
        click_trans_id: text_field(&body, "click_trans_id"),
        error_code: code,
        error_note: text_field(&body, "error_note").unwrap_or_default(),
        raw: body,
    })
}

#[async_trait]
impl PaymentGateway for ClickPaymentGateway {
    #[tracing::instrument(skip(self, request), fields(payment_id = %request.payment_id))]
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, PaymentError> {
        let mut payload = json!({
            "service_id": self.service_id,
            "merchant_id": self.merchant_id,
            "amount": amount_value(request.amount)?,
            "transaction_param": request.payment_id.to_string(),
            "merchant_trans_id": request.payment_id.to_string(),
            "card_type": self.card_type,
        });
        if let Some(return_url) = &self.return_url {
            payload["return_url"] = json!(return_url);
        }

        let body = self.post("/v2/merchant/invoice/create", &payload).await?;
        let (invoice_id, payment_url) = parse_invoice(&body)?;
        let payment_url = match payment_url {
            Some(url) => url,
            None => self.checkout_url(&request)?,
        };

        tracing::info!(invoice_id = ?invoice_id, "Click invoice created");
        Ok(Invoice {
            invoice_id,
            payment_url,
        })
    }

    #[tracing::instrument(skip(self, request), fields(payment_id = %request.payment_id))]
    async fn charge_card(&self, request: ChargeRequest) -> Result<ChargeOutcome, PaymentError> {
        let payload = json!({
            "service_id": self.service_id,
            "merchant_id": self.merchant_id,
            "amount": amount_value(request.amount)?,
            "merchant_trans_id": request.payment_id.to_string(),
            "card_token": request.card_token,
        });

        let body = self.post("/v2/card_token/payment", &payload).await?;
        let outcome = parse_charge(body)?;
        if !outcome.approved {
            tracing::warn!(
                error_code = outcome.error_code,
                error_note = %outcome.error_note,
                "Click declined card charge"
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PaymentId;
    use crate::ports::PaymentErrorCode;

    fn gateway(return_url: Option<&str>) -> ClickPaymentGateway {
        ClickPaymentGateway::new(&ClickConfig {
            merchant_id: "m1".to_string(),
            service_id: "s1".to_string(),
            return_url: return_url.map(str::to_string),
            api_base_url: "https://api.click.test/".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        assert_eq!(gateway(None).api_base_url, "https://api.click.test");
    }

    #[test]
    fn invoice_success_keeps_identifiers() {
        let body = json!({"error_code": 0, "error_note": "", "invoice_id": 5567});
        let (invoice_id, url) = parse_invoice(&body).unwrap();
        assert_eq!(invoice_id.as_deref(), Some("5567"));
        assert_eq!(url, None);
    }

    #[test]
    fn invoice_error_is_rejected_with_provider_code() {
        let body = json!({"error_code": -500, "error_note": "Service disabled"});
        let err = parse_invoice(&body).unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::Rejected);
        assert_eq!(err.provider_code.as_deref(), Some("-500"));
        assert_eq!(err.message, "Service disabled");
    }

    #[test]
    fn charge_parses_approval_and_decline() {
        let ok = parse_charge(json!({"error": 0, "click_trans_id": 99123, "error_note": "Success"}))
            .unwrap();
        assert!(ok.approved);
        assert_eq!(ok.click_trans_id.as_deref(), Some("99123"));

        let declined = parse_charge(json!({"error": "-5017", "error_note": "Insufficient funds"}))
            .unwrap();
        assert!(!declined.approved);
        assert_eq!(declined.error_code, -5017);
        assert_eq!(declined.click_trans_id, None);
    }

    #[test]
    fn charge_without_code_is_invalid() {
        let err = parse_charge(json!({"status": "weird"})).unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidResponse);
    }

    #[test]
    fn checkout_url_carries_payment_reference() {
        let request = InvoiceRequest {
            payment_id: PaymentId::new(42),
            amount: Decimal::new(6_700_000, 2),
        };
        let url = gateway(Some("https://fit.example/done")).checkout_url(&request).unwrap();
        assert!(url.starts_with("https://my.click.uz/services/pay?"));
        assert!(url.contains("transaction_param=42"));
        assert!(url.contains("amount=67000"));
        assert!(url.contains("return_url=https%3A%2F%2Ffit.example%2Fdone"));
    }
}
