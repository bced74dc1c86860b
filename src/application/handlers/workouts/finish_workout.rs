//! Handlers that close a workout session, either completed or abandoned.

use serde_json::json;
use std::sync::Arc;

use super::owned_session;
use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::foundation::{Timestamp, UserId, WorkoutSessionId};
use crate::domain::workout::{WorkoutError, WorkoutMetrics, WorkoutSession};
use crate::ports::{ActivityLog, WorkoutSessionRepository};

#[derive(Debug, Clone)]
pub struct CompleteWorkoutCommand {
    pub user_id: UserId,
    pub session_id: WorkoutSessionId,
    pub metrics: WorkoutMetrics,
}

/// Only in-progress sessions can be completed.
pub struct CompleteWorkoutHandler {
    sessions: Arc<dyn WorkoutSessionRepository>,
    activity: Arc<dyn ActivityLog>,
}

impl CompleteWorkoutHandler {
    pub fn new(sessions: Arc<dyn WorkoutSessionRepository>, activity: Arc<dyn ActivityLog>) -> Self {
        Self { sessions, activity }
    }

    pub async fn handle(&self, cmd: CompleteWorkoutCommand) -> Result<WorkoutSession, WorkoutError> {
        // 1. Load the caller's session
        let mut session = owned_session(self.sessions.as_ref(), cmd.user_id, cmd.session_id).await?;

        // 2. Close it with the reported totals
        session
            .complete(cmd.metrics, Timestamp::now())
            .map_err(WorkoutError::from_rejection)?;
        self.sessions.update(&session).await?;

        // 3. Funnel event
        record_activity(
            self.activity.as_ref(),
            UserActivity::new(
                cmd.user_id,
                ActivityKind::WorkoutCompleted,
                json!({
                    "session_id": session.id,
                    "duration_seconds": session.metrics.duration_seconds,
                    "exercises_completed": session.metrics.exercises_completed,
                    "total_calories": session.metrics.total_calories.to_string(),
                }),
            ),
        )
        .await;

        tracing::info!(
            user_id = %cmd.user_id,
            session_id = %session.id,
            duration = %session.formatted_duration(),
            "workout completed"
        );
        Ok(session)
    }
}

#[derive(Debug, Clone)]
pub struct AbandonWorkoutCommand {
    pub user_id: UserId,
    pub session_id: WorkoutSessionId,
}

pub struct AbandonWorkoutHandler {
    sessions: Arc<dyn WorkoutSessionRepository>,
}

impl AbandonWorkoutHandler {
    pub fn new(sessions: Arc<dyn WorkoutSessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, cmd: AbandonWorkoutCommand) -> Result<WorkoutSession, WorkoutError> {
        let mut session = owned_session(self.sessions.as_ref(), cmd.user_id, cmd.session_id).await?;
        session
            .abandon(Timestamp::now())
            .map_err(WorkoutError::from_rejection)?;
        self.sessions.update(&session).await?;
        Ok(session)
    }
}
