//! Registers the bot webhook and command list with Telegram.
//!
//! Reads the same configuration as the server and points Telegram at
//! `{telegram.webapp_url}/bot/webhook`.

use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;
use url::Url;

use fitness_hub::adapters::telegram::Command;
use fitness_hub::config::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "webhook setup failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let token = config
        .telegram
        .bot_token
        .as_ref()
        .ok_or("FITNESS_HUB__TELEGRAM__BOT_TOKEN is not set")?;
    let bot = Bot::new(token.expose_secret());

    let webhook_url = Url::parse(&config.telegram.webhook_url())?;
    let mut request = bot.set_webhook(webhook_url.clone());
    if let Some(secret) = &config.telegram.webhook_secret {
        request = request.secret_token(secret.expose_secret().to_string());
    }
    request.await?;
    tracing::info!(url = %webhook_url, "webhook registered");

    bot.set_my_commands(Command::bot_commands()).await?;
    tracing::info!("bot commands registered");

    let info = bot.get_webhook_info().await?;
    tracing::info!(
        pending_updates = info.pending_update_count,
        last_error = info.last_error_message.as_deref().unwrap_or("none"),
        "webhook status"
    );
    Ok(())
}
