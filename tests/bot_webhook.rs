//! Telegram webhook.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use common::{TestApp, ADMIN_ID, WEBHOOK_SECRET};
use fitness_hub::adapters::http::bot::SECRET_TOKEN_HEADER;
use fitness_hub::domain::foundation::TelegramId;

fn update(chat_id: i64, text: &str) -> String {
    json!({
        "update_id": 501,
        "message": {
            "message_id": 9,
            "date": 1_700_000_000,
            "chat": {"id": chat_id, "type": "private", "first_name": "Aziz"},
            "from": {"id": chat_id, "is_bot": false, "first_name": "Aziz"},
            "text": text
        }
    })
    .to_string()
}

fn webhook(body: String, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/bot/webhook")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_TOKEN_HEADER, secret);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn wrong_secret_is_401() {
    let app = TestApp::new();

    let (status, body) = app.send(webhook(update(77, "/start"), Some("nope"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("UNAUTHORIZED"));

    let (status, _) = app.send(webhook(update(77, "/start"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn start_replies_with_welcome() {
    let app = TestApp::new();

    let (status, _) = app
        .send(webhook(update(77, "/start"), Some(WEBHOOK_SECRET)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let texts = app.notifier.texts_to(TelegramId::new(77).unwrap());
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Welcome Aziz"));
}

#[tokio::test]
async fn admin_command_is_refused_for_other_chats() {
    let app = TestApp::new();

    app.send(webhook(update(77, "/admin"), Some(WEBHOOK_SECRET)))
        .await;
    app.send(webhook(update(ADMIN_ID, "/admin"), Some(WEBHOOK_SECRET)))
        .await;

    let stranger = app.notifier.texts_to(TelegramId::new(77).unwrap());
    let admin = app.notifier.texts_to(TelegramId::new(ADMIN_ID).unwrap());
    assert_eq!(stranger.len(), 1);
    assert_eq!(admin.len(), 1);
    assert_ne!(stranger[0], admin[0]);
}

#[tokio::test]
async fn non_command_and_garbage_updates_are_acknowledged() {
    let app = TestApp::new();

    let (status, _) = app
        .send(webhook(update(77, "hello there"), Some(WEBHOOK_SECRET)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(webhook("{not json".to_string(), Some(WEBHOOK_SECRET)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.notifier.sent().is_empty());
}
