//! Workout handlers - training sessions and progress statistics.

mod finish_workout;
mod get_trainer_stats;
mod get_workout_history;
mod start_workout;

pub use finish_workout::{
    AbandonWorkoutCommand, AbandonWorkoutHandler, CompleteWorkoutCommand, CompleteWorkoutHandler,
};
pub use get_trainer_stats::{GetTrainerStatsHandler, GetTrainerStatsQuery};
pub use get_workout_history::{GetWorkoutHistoryHandler, GetWorkoutHistoryQuery};
pub use start_workout::{StartWorkoutCommand, StartWorkoutHandler};

use crate::domain::foundation::{UserId, WorkoutSessionId};
use crate::domain::workout::{WorkoutError, WorkoutSession};
use crate::ports::WorkoutSessionRepository;

/// Loads a session, hiding sessions owned by other users.
pub(crate) async fn owned_session(
    sessions: &dyn WorkoutSessionRepository,
    user_id: UserId,
    session_id: WorkoutSessionId,
) -> Result<WorkoutSession, WorkoutError> {
    sessions
        .find_by_id(session_id)
        .await?
        .filter(|s| s.user_id == user_id)
        .ok_or(WorkoutError::SessionNotFound(session_id))
}
