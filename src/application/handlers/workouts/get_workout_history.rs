//! GetWorkoutHistoryHandler - the user's sessions, newest first.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::workout::{WorkoutError, WorkoutSession};
use crate::ports::WorkoutSessionRepository;

#[derive(Debug, Clone)]
pub struct GetWorkoutHistoryQuery {
    pub user_id: UserId,
    pub limit: Option<usize>,
}

pub struct GetWorkoutHistoryHandler {
    sessions: Arc<dyn WorkoutSessionRepository>,
}

impl GetWorkoutHistoryHandler {
    pub fn new(sessions: Arc<dyn WorkoutSessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetWorkoutHistoryQuery) -> Result<Vec<WorkoutSession>, WorkoutError> {
        let mut sessions = self.sessions.list_by_user(query.user_id).await?;
        if let Some(limit) = query.limit {
            sessions.truncate(limit);
        }
        Ok(sessions)
    }
}
