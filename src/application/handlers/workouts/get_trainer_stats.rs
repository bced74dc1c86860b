//! GetTrainerStatsHandler - totals and streak for the progress screen.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::workout::{TrainerStats, WorkoutError};
use crate::ports::WorkoutSessionRepository;

#[derive(Debug, Clone)]
pub struct GetTrainerStatsQuery {
    pub user_id: UserId,
    /// Calendar day the streak is counted back from.
    pub today: NaiveDate,
}

pub struct GetTrainerStatsHandler {
    sessions: Arc<dyn WorkoutSessionRepository>,
}

impl GetTrainerStatsHandler {
    pub fn new(sessions: Arc<dyn WorkoutSessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetTrainerStatsQuery) -> Result<TrainerStats, WorkoutError> {
        let sessions = self.sessions.list_by_user(query.user_id).await?;
        Ok(TrainerStats::from_sessions(&sessions, query.today))
    }
}
