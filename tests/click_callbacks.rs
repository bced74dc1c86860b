//! Click prepare/complete callbacks driving a checkout to an active subscription.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{TestApp, CLICK_SECRET};
use fitness_hub::domain::billing::compute_sign;
use fitness_hub::domain::foundation::TelegramId;

const SERVICE_ID: &str = "5001";
const SIGN_TIME: &str = "2024-05-20 10:00:00";

struct Callback {
    click_trans_id: String,
    merchant_trans_id: String,
    amount: String,
    action: &'static str,
    error: &'static str,
    sign: Option<String>,
}

impl Callback {
    fn new(payment_id: i64, amount: &str, action: &'static str) -> Self {
        Self {
            click_trans_id: format!("ct-{}", payment_id),
            merchant_trans_id: payment_id.to_string(),
            amount: amount.to_string(),
            action,
            error: "0",
            sign: None,
        }
    }

    async fn send(&self, app: &TestApp, phase: &str) -> (StatusCode, Value) {
        let sign = self.sign.clone().unwrap_or_else(|| {
            compute_sign(
                &self.click_trans_id,
                SERVICE_ID,
                CLICK_SECRET,
                &self.merchant_trans_id,
                &self.amount,
                self.action,
                SIGN_TIME,
            )
        });
        let prepare_id = self.merchant_trans_id.clone();
        app.form(
            &format!("/click/{}", phase),
            &[
                ("click_trans_id", self.click_trans_id.as_str()),
                ("service_id", SERVICE_ID),
                ("click_paydoc_id", "77"),
                ("merchant_trans_id", self.merchant_trans_id.as_str()),
                ("merchant_prepare_id", prepare_id.as_str()),
                ("amount", self.amount.as_str()),
                ("action", self.action),
                ("error", self.error),
                ("error_note", "Success"),
                ("sign_time", SIGN_TIME),
                ("sign_string", sign.as_str()),
            ],
        )
        .await
    }
}

async fn checkout(app: &TestApp, token: &str) -> (i64, String) {
    let (status, body) = app.json(Method::POST, "/api/payments", Some(token), None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["payment_url"].as_str().unwrap().starts_with("https://pay.example/"));
    let amount = body["amount"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body["amount"].to_string());
    (body["payment_id"].as_i64().unwrap(), amount)
}

#[tokio::test]
async fn prepare_then_complete_grants_access() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (_, before) = app.json(Method::GET, "/api/subscription", Some(&token), None).await;
    assert_eq!(before["has_access"], json!(false));

    let (payment_id, amount) = checkout(&app, &token).await;

    let (status, body) = Callback::new(payment_id, &amount, "0").send(&app, "prepare").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], json!(0), "{}", body);
    assert_eq!(body["merchant_prepare_id"], json!(payment_id));

    let (status, body) = Callback::new(payment_id, &amount, "1").send(&app, "complete").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], json!(0), "{}", body);
    assert_eq!(body["merchant_confirm_id"], json!(payment_id));

    let (_, after) = app.json(Method::GET, "/api/subscription", Some(&token), None).await;
    assert_eq!(after["has_access"], json!(true));
    assert!(after["days_remaining"].as_i64().unwrap() >= 29);

    let (_, history) = app.json(Method::GET, "/api/payments", Some(&token), None).await;
    assert_eq!(history[0]["status"], json!("completed"));

    assert_eq!(
        app.notifier.texts_to(TelegramId::new(42).unwrap()).len(),
        1
    );
}

#[tokio::test]
async fn repeated_complete_is_already_paid() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;
    let (payment_id, amount) = checkout(&app, &token).await;

    let complete = Callback::new(payment_id, &amount, "1");
    let (_, first) = complete.send(&app, "complete").await;
    assert_eq!(first["error"], json!(0));

    let (status, second) = complete.send(&app, "complete").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["error"], json!(-4));
}

#[tokio::test]
async fn wrong_amount_is_rejected() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;
    let (payment_id, _) = checkout(&app, &token).await;

    let (status, body) = Callback::new(payment_id, "1000", "0").send(&app, "prepare").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], json!(-2));
}

#[tokio::test]
async fn bad_sign_is_rejected_before_anything_else() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;
    let (payment_id, amount) = checkout(&app, &token).await;

    let mut callback = Callback::new(payment_id, &amount, "0");
    callback.sign = Some("0".repeat(32));
    let (_, body) = callback.send(&app, "prepare").await;
    assert_eq!(body["error"], json!(-1));
}

#[tokio::test]
async fn wrong_phase_and_unknown_payment() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;
    let (payment_id, amount) = checkout(&app, &token).await;

    let (_, body) = Callback::new(payment_id, &amount, "1").send(&app, "prepare").await;
    assert_eq!(body["error"], json!(-3));

    let (_, body) = Callback::new(9999, &amount, "0").send(&app, "prepare").await;
    assert_eq!(body["error"], json!(-5));
}

#[tokio::test]
async fn reported_failure_cancels_the_payment() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;
    let (payment_id, amount) = checkout(&app, &token).await;

    let mut callback = Callback::new(payment_id, &amount, "1");
    callback.error = "-5017";
    let (_, body) = callback.send(&app, "complete").await;
    assert_eq!(body["error"], json!(-9));

    let (_, subscription) = app.json(Method::GET, "/api/subscription", Some(&token), None).await;
    assert_eq!(subscription["has_access"], json!(false));

    // A cancelled payment stays cancelled.
    callback.error = "0";
    let (_, body) = callback.send(&app, "complete").await;
    assert_eq!(body["error"], json!(-9));
}

#[tokio::test]
async fn malformed_form_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.form("/click/prepare", &[("click_trans_id", "1")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], json!(-8));
}
