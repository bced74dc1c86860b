//! Notifier port for pushing messages to a user's Telegram chat.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::TelegramId;

/// Inline button attached under a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageButton {
    /// Opens the Mini App inside Telegram.
    WebApp { text: String, url: String },
    /// Opens a regular link.
    Url { text: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    /// Send with HTML parse mode.
    pub html: bool,
    pub button: Option<MessageButton>,
}

impl OutgoingMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: false,
            button: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: true,
            button: None,
        }
    }

    pub fn with_button(mut self, button: MessageButton) -> Self {
        self.button = Some(button);
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("invalid button url: {0}")]
    InvalidUrl(String),

    #[error("telegram request failed: {0}")]
    Delivery(String),
}

/// Delivery is best effort: callers log failures and carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat: TelegramId, message: OutgoingMessage) -> Result<(), NotifyError>;
}
