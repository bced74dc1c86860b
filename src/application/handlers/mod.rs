//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, grouped by
//! module. Each handler owns `Arc<dyn Port>` dependencies and exposes a single
//! `handle` method.

pub mod billing;
pub mod bot;
pub mod catalog;
pub mod favorites;
pub mod users;
pub mod workouts;

use crate::domain::activity::UserActivity;
use crate::domain::foundation::TelegramId;
use crate::ports::{ActivityLog, Notifier, OutgoingMessage};

/// Activity logging never fails the request that triggered it.
pub(crate) async fn record_activity(log: &dyn ActivityLog, activity: UserActivity) {
    let kind = activity.kind;
    if let Err(err) = log.record(activity).await {
        tracing::warn!(error = %err, kind = %kind, "failed to record user activity");
    }
}

/// Notifications are best effort; delivery failures are logged and dropped.
pub(crate) async fn notify(notifier: &dyn Notifier, chat: TelegramId, message: OutgoingMessage) {
    if let Err(err) = notifier.send(chat, message).await {
        tracing::warn!(error = %err, chat_id = %chat, "failed to deliver notification");
    }
}
