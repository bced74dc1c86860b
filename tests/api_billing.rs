//! Subscription, card and payment-history endpoints.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

fn card() -> serde_json::Value {
    json!({
        "card_token": "tok-secret-123",
        "card_number": "8600 **** **** 4242",
        "expiry_month": 12,
        "expiry_year": 2099
    })
}

#[tokio::test]
async fn fresh_user_has_no_access() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, body) = app.json(Method::GET, "/api/subscription", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_access"], json!(false));
    assert!(body["subscription"].is_null());
    assert_eq!(body["days_remaining"], json!(0));

    let (_, history) = app.json(Method::GET, "/api/payments", Some(&token), None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn managing_a_missing_subscription_is_404() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, body) = app
        .json(Method::POST, "/api/subscription/cancel", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("SUBSCRIPTION_NOT_FOUND"));

    let (status, _) = app
        .json(
            Method::POST,
            "/api/subscription/auto-renew",
            Some(&token),
            Some(json!({"enabled": false})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn saved_card_never_exposes_its_token() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, body) = app
        .json(Method::POST, "/api/payments/card", Some(&token), Some(card()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["card_last_four"], json!("4242"));
    assert_eq!(body["card_type"], json!("uzcard"));
    assert!(body.get("card_token").is_none());
    assert!(!body.to_string().contains("tok-secret-123"));

    let (status, _) = app
        .json(Method::DELETE, "/api/payments/card", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .json(Method::DELETE, "/api/payments/card", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("PAYMENT_METHOD_NOT_FOUND"));
}

#[tokio::test]
async fn invalid_card_is_400() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let mut bad = card();
    bad["expiry_month"] = json!(13);
    let (status, _) = app
        .json(Method::POST, "/api/payments/card", Some(&token), Some(bad))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut expired = card();
    expired["expiry_year"] = json!(2001);
    let (status, _) = app
        .json(Method::POST, "/api/payments/card", Some(&token), Some(expired))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_creates_pending_payment_and_invoice() {
    let app = TestApp::new();
    let token = app.sign_in(42).await;

    let (status, body) = app.json(Method::POST, "/api/payments", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.gateway.invoices.lock().unwrap().len(), 1);

    let (_, history) = app.json(Method::GET, "/api/payments", Some(&token), None).await;
    assert_eq!(history[0]["id"], body["payment_id"]);
    assert_eq!(history[0]["status"], json!("pending"));
    assert_eq!(history[0]["is_auto_payment"], json!(false));
}

#[tokio::test]
async fn billing_requires_session() {
    let app = TestApp::new();
    let (status, _) = app.json(Method::POST, "/api/payments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
