//! Chat command parsing.

use teloxide::types::{Message, Update, UpdateKind};
use teloxide::utils::command::BotCommands;

use crate::application::handlers::bot::{BotCommand, BotCommandRequest};
use crate::domain::foundation::TelegramId;

/// Commands registered with Telegram and accepted from chats.
#[derive(BotCommands, Debug, Clone, Copy, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "🏋️ Fitness Bot Commands:")]
pub enum Command {
    #[command(description = "Begin your fitness journey")]
    Start,
    #[command(description = "Show help menu")]
    Help,
    #[command(description = "Open the admin panel", hide)]
    Admin,
}

impl From<Command> for BotCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => BotCommand::Start,
            Command::Help => BotCommand::Help,
            Command::Admin => BotCommand::Admin,
        }
    }
}

/// Reads the leading command of a message. Arguments (such as a `/start`
/// deep-link payload) and a `@botname` suffix are ignored.
pub fn parse_command(text: &str) -> Option<Command> {
    let head = text.split_whitespace().next()?;
    let bare = head.split('@').next()?;
    Command::parse(bare, "").ok()
}

fn command_from_message(message: &Message) -> Option<BotCommandRequest> {
    let command = parse_command(message.text()?)?;
    let chat = TelegramId::new(message.chat.id.0).ok()?;
    Some(BotCommandRequest {
        command: command.into(),
        chat,
        first_name: message.chat.first_name().unwrap_or_default().to_string(),
    })
}

/// The command carried by an update, if it is a private text message with one.
pub fn command_request(update: &Update) -> Option<BotCommandRequest> {
    match &update.kind {
        UpdateKind::Message(message) => command_from_message(message),
        _ => None,
    }
}
