//! BotCommandHandler - /start, /help and /admin.

use std::sync::Arc;

use crate::application::handlers::{notify, record_activity};
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::foundation::{DomainError, TelegramId};
use crate::ports::{ActivityLog, MessageButton, Notifier, OutgoingMessage, ProfileRepository};

/// Commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Admin,
}

#[derive(Debug, Clone)]
pub struct BotCommandRequest {
    pub command: BotCommand,
    pub chat: TelegramId,
    pub first_name: String,
}

#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Public base URL of the Mini App, without trailing slash.
    pub webapp_url: String,
    pub admin_telegram_id: Option<i64>,
}

pub struct BotCommandHandler {
    profiles: Arc<dyn ProfileRepository>,
    activity: Arc<dyn ActivityLog>,
    notifier: Arc<dyn Notifier>,
    settings: BotSettings,
}

impl BotCommandHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        activity: Arc<dyn ActivityLog>,
        notifier: Arc<dyn Notifier>,
        settings: BotSettings,
    ) -> Self {
        Self {
            profiles,
            activity,
            notifier,
            settings,
        }
    }

    /// Sends the reply to the chat and returns it.
    pub async fn handle(&self, request: BotCommandRequest) -> Result<OutgoingMessage, DomainError> {
        let reply = match request.command {
            BotCommand::Start => {
                if let Some(profile) = self.profiles.find_by_telegram_id(request.chat).await? {
                    record_activity(
                        self.activity.as_ref(),
                        UserActivity::bare(profile.id, ActivityKind::BotStart),
                    )
                    .await;
                }
                self.welcome(&request.first_name)
            }
            BotCommand::Help => OutgoingMessage::plain(
                "🏋️ Fitness Bot Commands:\n\n/start - Begin your fitness journey\n/help - Show help menu",
            ),
            BotCommand::Admin => self.admin(request.chat),
        };

        tracing::debug!(chat_id = %request.chat, command = ?request.command, "bot command handled");
        notify(self.notifier.as_ref(), request.chat, reply.clone()).await;
        Ok(reply)
    }

    fn welcome(&self, first_name: &str) -> OutgoingMessage {
        let name = match first_name.trim() {
            "" => "there",
            name => name,
        };
        OutgoingMessage::plain(format!(
            "💪 Welcome {}!\n\nReady to transform your body?\n\n\
             Tap the button below to create your personalized workout plan! 🚀",
            name
        ))
        .with_button(MessageButton::WebApp {
            text: "🏋️ Start Fitness Inline".to_string(),
            url: format!("{}/miniapp/questionnaire/", self.settings.webapp_url),
        })
    }

    fn admin(&self, chat: TelegramId) -> OutgoingMessage {
        if self.settings.admin_telegram_id != Some(chat.as_i64()) {
            return OutgoingMessage::plain("⚠️ This section is for admins only");
        }
        OutgoingMessage::plain("🔐 Admin panel").with_button(MessageButton::Url {
            text: "Open admin panel".to_string(),
            url: format!("{}/admin/", self.settings.webapp_url),
        })
    }
}
