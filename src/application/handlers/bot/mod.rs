//! Bot handlers - replies to chat commands.

mod handle_command;

pub use handle_command::{BotCommand, BotCommandHandler, BotCommandRequest, BotSettings};
