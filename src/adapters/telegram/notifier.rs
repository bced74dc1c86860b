//! Notifier over the Telegram Bot API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, WebAppInfo};
use url::Url;

use crate::domain::foundation::TelegramId;
use crate::ports::{MessageButton, Notifier, NotifyError, OutgoingMessage};

pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot_token: &SecretString) -> Self {
        Self {
            bot: Bot::new(bot_token.expose_secret()),
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, NotifyError> {
    Url::parse(raw).map_err(|e| NotifyError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Single-button inline keyboard.
pub(crate) fn keyboard(button: &MessageButton) -> Result<InlineKeyboardMarkup, NotifyError> {
    let button = match button {
        MessageButton::WebApp { text, url } => InlineKeyboardButton::web_app(
            text.clone(),
            WebAppInfo {
                url: parse_url(url)?,
            },
        ),
        MessageButton::Url { text, url } => InlineKeyboardButton::url(text.clone(), parse_url(url)?),
    };
    Ok(InlineKeyboardMarkup::new(vec![vec![button]]))
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[tracing::instrument(skip(self, message), fields(chat_id = %chat))]
    async fn send(&self, chat: TelegramId, message: OutgoingMessage) -> Result<(), NotifyError> {
        let markup = message.button.as_ref().map(keyboard).transpose()?;

        let mut request = self.bot.send_message(ChatId(chat.as_i64()), message.text);
        if message.html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }

        request
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(())
    }
}

/// Stand-in used when no bot token is configured. Messages go to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, chat: TelegramId, message: OutgoingMessage) -> Result<(), NotifyError> {
        tracing::info!(chat_id = %chat, text = %message.text, "telegram disabled, message not sent");
        Ok(())
    }
}
