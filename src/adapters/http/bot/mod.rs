//! HTTP adapter for the Telegram bot webhook.

mod handlers;
mod routes;

pub use handlers::{BotWebhookState, SECRET_TOKEN_HEADER};
pub use routes::bot_routes;
