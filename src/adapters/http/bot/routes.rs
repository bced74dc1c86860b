//! HTTP routes for the Telegram webhook.

use axum::{routing::post, Router};

use super::handlers::{telegram_webhook, BotWebhookState};

pub fn bot_routes(state: BotWebhookState) -> Router {
    Router::new()
        .route("/bot/webhook", post(telegram_webhook))
        .with_state(state)
}
