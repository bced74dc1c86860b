//! HTTP adapter for workout sessions and progress statistics.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CompleteWorkoutRequest, HistoryParams, StartWorkoutRequest, TrainerStatsResponse,
    WorkoutSessionResponse,
};
pub use handlers::{WorkoutApiError, WorkoutHandlers};
pub use routes::workout_routes;
