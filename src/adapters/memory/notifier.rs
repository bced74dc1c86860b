//! Notifier that keeps messages instead of sending them.
//!
//! Used in tests and when no bot token is configured.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::TelegramId;
use crate::ports::{Notifier, NotifyError, OutgoingMessage};

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(TelegramId, OutgoingMessage)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(TelegramId, OutgoingMessage)> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Texts sent to one chat, oldest first.
    pub fn texts_to(&self, chat: TelegramId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| *to == chat)
            .map(|(_, message)| message.text)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, chat: TelegramId, message: OutgoingMessage) -> Result<(), NotifyError> {
        tracing::debug!(chat_id = %chat, "recording outgoing message");
        self.sent
            .lock()
            .map_err(|_| NotifyError::Delivery("recorder lock poisoned".to_string()))?
            .push((chat, message));
        Ok(())
    }
}
