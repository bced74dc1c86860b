//! HTTP routes for workout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    abandon_workout, complete_workout, start_workout, trainer_stats, workout_history,
    WorkoutHandlers,
};

/// Workout routes, relative to `/api`. All require a session.
pub fn workout_routes(handlers: WorkoutHandlers) -> Router {
    Router::new()
        .route("/workouts/start", post(start_workout))
        .route("/workouts/stats", get(trainer_stats))
        .route("/workouts/history", get(workout_history))
        .route("/workouts/:id/complete", post(complete_workout))
        .route("/workouts/:id/abandon", post(abandon_workout))
        .with_state(handlers)
}
