//! Telegram webhook endpoint.
//!
//! Once the secret token matches, every update is acknowledged with 200 so
//! Telegram does not redeliver it; updates we cannot use are logged and
//! dropped.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use teloxide::types::Update;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::telegram::command_request;
use crate::application::handlers::bot::BotCommandHandler;
use crate::domain::foundation::ErrorCode;

/// Header Telegram fills with the secret registered through `setWebhook`.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct BotWebhookState {
    pub handler: Arc<BotCommandHandler>,
    /// When set, requests must carry it in [`SECRET_TOKEN_HEADER`].
    pub secret: Option<SecretString>,
}

impl BotWebhookState {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };
        let received = headers
            .get(SECRET_TOKEN_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        secret.expose_secret().as_bytes().ct_eq(received).into()
    }
}

/// POST /bot/webhook
pub async fn telegram_webhook(
    State(state): State<BotWebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.authorized(&headers) {
        tracing::warn!("telegram webhook called with a bad secret token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(ErrorCode::Unauthorized, "Invalid secret token")),
        )
            .into_response();
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(err) => {
            tracing::warn!(error = %err, "unparseable telegram update");
            return StatusCode::OK.into_response();
        }
    };

    let Some(request) = command_request(&update) else {
        tracing::debug!("telegram update without a command");
        return StatusCode::OK.into_response();
    };

    if let Err(err) = state.handler.handle(request).await {
        tracing::error!(error = %err, "bot command failed");
    }
    StatusCode::OK.into_response()
}
