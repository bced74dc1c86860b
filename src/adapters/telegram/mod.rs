//! Telegram adapters.
//!
//! - `notifier` - `Notifier` port over `teloxide::Bot`
//! - `commands` - `/start`, `/help` and `/admin` parsing for the webhook

mod commands;
mod notifier;

pub use commands::{command_request, parse_command, Command};
pub use notifier::{LogNotifier, TelegramNotifier};
