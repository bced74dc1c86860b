//! Click merchant callback protocol.
//!
//! Click confirms a payment in two phases. Both phases post a form carrying an
//! MD5 `sign_string` computed over
//! `click_trans_id + service_id + secret_key + merchant_trans_id + amount + action + sign_time`
//! using the raw field values, and expect a JSON answer with an `error` code
//! from [`ClickErrorCode`].

use md5::{Digest, Md5};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use subtle::ConstantTimeEq;

use crate::domain::foundation::PaymentId;

/// Callback phase, sent as the `action` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Prepare,
    Complete,
}

impl ClickAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "0" => Some(ClickAction::Prepare),
            "1" => Some(ClickAction::Complete),
            _ => None,
        }
    }
}

/// Result codes defined by Click. Values and notes are fixed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickErrorCode {
    Success,
    SignCheckFailed,
    IncorrectAmount,
    ActionNotFound,
    AlreadyPaid,
    PaymentNotFound,
    BadRequest,
    TransactionCancelled,
}

impl ClickErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            ClickErrorCode::Success => 0,
            ClickErrorCode::SignCheckFailed => -1,
            ClickErrorCode::IncorrectAmount => -2,
            ClickErrorCode::ActionNotFound => -3,
            ClickErrorCode::AlreadyPaid => -4,
            ClickErrorCode::PaymentNotFound => -5,
            ClickErrorCode::BadRequest => -8,
            ClickErrorCode::TransactionCancelled => -9,
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            ClickErrorCode::Success => "Success",
            ClickErrorCode::SignCheckFailed => "Sign check failed",
            ClickErrorCode::IncorrectAmount => "Incorrect amount",
            ClickErrorCode::ActionNotFound => "Action not found",
            ClickErrorCode::AlreadyPaid => "Already paid",
            ClickErrorCode::PaymentNotFound => "Payment not found",
            ClickErrorCode::BadRequest => "Error in request from click",
            ClickErrorCode::TransactionCancelled => "Transaction cancelled",
        }
    }
}

/// Computes the lowercase hex MD5 sign for a callback.
pub fn compute_sign(
    click_trans_id: &str,
    service_id: &str,
    secret_key: &str,
    merchant_trans_id: &str,
    amount: &str,
    action: &str,
    sign_time: &str,
) -> String {
    let mut hasher = Md5::new();
    for part in [
        click_trans_id,
        service_id,
        secret_key,
        merchant_trans_id,
        amount,
        action,
        sign_time,
    ] {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Prepare/complete form body. Values are kept verbatim because the sign is
/// computed over the raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickCallback {
    pub click_trans_id: String,
    pub service_id: String,
    #[serde(default)]
    pub click_paydoc_id: Option<String>,
    pub merchant_trans_id: String,
    #[serde(default)]
    pub merchant_prepare_id: Option<String>,
    pub amount: String,
    pub action: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_note: Option<String>,
    pub sign_time: String,
    pub sign_string: String,
}

impl ClickCallback {
    pub fn expected_sign(&self, secret_key: &str) -> String {
        compute_sign(
            &self.click_trans_id,
            &self.service_id,
            secret_key,
            &self.merchant_trans_id,
            &self.amount,
            &self.action,
            &self.sign_time,
        )
    }

    /// Constant-time, case-insensitive comparison against `sign_string`.
    pub fn verify_sign(&self, secret_key: &str) -> bool {
        let expected = self.expected_sign(secret_key);
        let received = self.sign_string.trim().to_ascii_lowercase();
        expected.as_bytes().ct_eq(received.as_bytes()).into()
    }

    pub fn action(&self) -> Option<ClickAction> {
        ClickAction::parse(&self.action)
    }

    pub fn payment_id(&self) -> Option<PaymentId> {
        self.merchant_trans_id.trim().parse::<i64>().ok().map(PaymentId::new)
    }

    pub fn amount(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }

    /// Click reports its own outcome in `error`; anything but `0` is a failure.
    pub fn gateway_succeeded(&self) -> bool {
        self.error.as_deref().map(str::trim) == Some("0")
    }

    /// Callback fields stored as payment metadata.
    pub fn to_metadata(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// JSON answer to a prepare or complete callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_trans_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_trans_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_prepare_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_confirm_id: Option<i64>,
    pub error: i32,
    pub error_note: String,
}

impl ClickResponse {
    pub fn error(code: ClickErrorCode) -> Self {
        Self {
            click_trans_id: None,
            merchant_trans_id: None,
            merchant_prepare_id: None,
            merchant_confirm_id: None,
            error: code.code(),
            error_note: code.note().to_string(),
        }
    }

    pub fn prepared(callback: &ClickCallback, payment_id: PaymentId) -> Self {
        Self {
            click_trans_id: Some(callback.click_trans_id.clone()),
            merchant_trans_id: Some(callback.merchant_trans_id.clone()),
            merchant_prepare_id: Some(payment_id.as_i64()),
            ..Self::error(ClickErrorCode::Success)
        }
    }

    pub fn confirmed(callback: &ClickCallback, payment_id: PaymentId) -> Self {
        Self {
            click_trans_id: Some(callback.click_trans_id.clone()),
            merchant_trans_id: Some(callback.merchant_trans_id.clone()),
            merchant_confirm_id: Some(payment_id.as_i64()),
            ..Self::error(ClickErrorCode::Success)
        }
    }

    pub fn is_success(&self) -> bool {
        self.error == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "s3cret";

    fn callback(amount: &str, action: &str) -> ClickCallback {
        let mut cb = ClickCallback {
            click_trans_id: "2001".to_string(),
            service_id: "77".to_string(),
            click_paydoc_id: Some("9001".to_string()),
            merchant_trans_id: "15".to_string(),
            merchant_prepare_id: None,
            amount: amount.to_string(),
            action: action.to_string(),
            error: Some("0".to_string()),
            error_note: Some("Success".to_string()),
            sign_time: "2024-05-01 10:00:00".to_string(),
            sign_string: String::new(),
        };
        cb.sign_string = cb.expected_sign(SECRET);
        cb
    }

    #[test]
    fn sign_is_md5_of_concatenated_fields() {
        let expected = hex::encode(Md5::digest(b"200177s3cret15670000"));
        let sign = compute_sign("2001", "77", SECRET, "15", "67000", "0", "");
        assert_eq!(sign, expected);
        assert_eq!(sign.len(), 32);
    }

    #[test]
    fn verifies_own_sign_in_any_case() {
        let mut cb = callback("67000", "0");
        assert!(cb.verify_sign(SECRET));
        cb.sign_string = cb.sign_string.to_uppercase();
        assert!(cb.verify_sign(SECRET));
        assert!(!cb.verify_sign("other"));
    }

    #[test]
    fn sign_uses_raw_amount_text() {
        let cb = callback("67000.00", "0");
        let mut altered = cb.clone();
        altered.amount = "67000".to_string();
        assert!(!altered.verify_sign(SECRET));
        assert_eq!(cb.amount(), altered.amount());
    }

    #[test]
    fn parses_action_and_payment_id() {
        let cb = callback("67000", "1");
        assert_eq!(cb.action(), Some(ClickAction::Complete));
        assert_eq!(cb.payment_id(), Some(PaymentId::new(15)));
        assert_eq!(ClickAction::parse("2"), None);

        let mut bad = cb.clone();
        bad.merchant_trans_id = "abc".to_string();
        assert_eq!(bad.payment_id(), None);
    }

    #[test]
    fn gateway_error_field_decides_outcome() {
        let mut cb = callback("67000", "1");
        assert!(cb.gateway_succeeded());
        cb.error = Some("-5017".to_string());
        assert!(!cb.gateway_succeeded());
        cb.error = None;
        assert!(!cb.gateway_succeeded());
    }

    #[test]
    fn error_codes_match_gateway_table() {
        let table = [
            (ClickErrorCode::Success, 0, "Success"),
            (ClickErrorCode::SignCheckFailed, -1, "Sign check failed"),
            (ClickErrorCode::IncorrectAmount, -2, "Incorrect amount"),
            (ClickErrorCode::ActionNotFound, -3, "Action not found"),
            (ClickErrorCode::AlreadyPaid, -4, "Already paid"),
            (ClickErrorCode::PaymentNotFound, -5, "Payment not found"),
            (ClickErrorCode::BadRequest, -8, "Error in request from click"),
            (ClickErrorCode::TransactionCancelled, -9, "Transaction cancelled"),
        ];
        for (code, value, note) in table {
            assert_eq!(code.code(), value);
            assert_eq!(code.note(), note);
        }
    }

    #[test]
    fn error_response_omits_ids() {
        let body = serde_json::to_value(ClickResponse::error(ClickErrorCode::IncorrectAmount)).unwrap();
        assert_eq!(body, serde_json::json!({"error": -2, "error_note": "Incorrect amount"}));
    }

    #[test]
    fn prepared_response_echoes_ids() {
        let cb = callback("67000", "0");
        let body = serde_json::to_value(ClickResponse::prepared(&cb, PaymentId::new(15))).unwrap();
        assert_eq!(body["merchant_prepare_id"], 15);
        assert_eq!(body["click_trans_id"], "2001");
        assert_eq!(body["error"], 0);
    }

    proptest! {
        #[test]
        fn altering_any_signed_field_breaks_the_sign(field in 0usize..6, junk in "[a-z0-9]{1,8}") {
            let cb = callback("67000", "0");
            let mut altered = cb.clone();
            match field {
                0 => altered.click_trans_id.push_str(&junk),
                1 => altered.service_id.push_str(&junk),
                2 => altered.merchant_trans_id.push_str(&junk),
                3 => altered.amount.push_str(&junk),
                4 => altered.action.push_str(&junk),
                _ => altered.sign_time.push_str(&junk),
            }
            prop_assert!(cb.verify_sign(SECRET));
            prop_assert!(!altered.verify_sign(SECRET));
        }
    }
}
