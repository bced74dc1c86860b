//! In-memory activity log.

use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::ActivityLog;

#[derive(Default)]
pub struct InMemoryActivityLog {
    records: Mutex<Vec<UserActivity>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events in insertion order.
    pub fn records(&self) -> Vec<UserActivity> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Kinds recorded for one user, in insertion order.
    pub fn kinds_for(&self, user_id: UserId) -> Vec<ActivityKind> {
        self.records()
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.kind)
            .collect()
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record(&self, activity: UserActivity) -> Result<(), DomainError> {
        lock(&self.records)?.push(activity);
        Ok(())
    }
}
