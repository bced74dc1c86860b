//! StartWorkoutHandler - opens a session for one day of an edition.

use serde_json::json;
use std::sync::Arc;

use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::catalog::EditionPlan;
use crate::domain::foundation::{EditionId, Timestamp, UserId};
use crate::domain::workout::{NewWorkoutSession, WorkoutError, WorkoutSession};
use crate::ports::{ActivityLog, CatalogReader, WorkoutSessionRepository};

#[derive(Debug, Clone)]
pub struct StartWorkoutCommand {
    pub user_id: UserId,
    pub edition_id: EditionId,
    pub day_number: i32,
}

pub struct StartWorkoutHandler {
    catalog: Arc<dyn CatalogReader>,
    sessions: Arc<dyn WorkoutSessionRepository>,
    activity: Arc<dyn ActivityLog>,
}

impl StartWorkoutHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        sessions: Arc<dyn WorkoutSessionRepository>,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            catalog,
            sessions,
            activity,
        }
    }

    pub async fn handle(&self, cmd: StartWorkoutCommand) -> Result<WorkoutSession, WorkoutError> {
        // 1. The day must be scheduled in the edition
        let edition = self
            .catalog
            .get_edition(cmd.edition_id)
            .await?
            .ok_or(WorkoutError::EditionNotFound(cmd.edition_id))?;
        let plan = EditionPlan::new(edition, self.catalog.list_edition_exercises(cmd.edition_id).await?);
        if !plan.has_day(cmd.day_number) {
            return Err(WorkoutError::DayNotInPlan {
                edition_id: cmd.edition_id,
                day_number: cmd.day_number,
            });
        }

        // 2. Open the session
        let session = self
            .sessions
            .create(NewWorkoutSession {
                user_id: cmd.user_id,
                edition_id: cmd.edition_id,
                day_number: cmd.day_number,
                started_at: Timestamp::now(),
            })
            .await?;

        record_activity(
            self.activity.as_ref(),
            UserActivity::new(
                cmd.user_id,
                ActivityKind::WorkoutStarted,
                json!({
                    "session_id": session.id,
                    "edition_id": cmd.edition_id,
                    "day_number": cmd.day_number,
                }),
            ),
        )
        .await;

        tracing::info!(user_id = %cmd.user_id, session_id = %session.id, "workout started");
        Ok(session)
    }
}
