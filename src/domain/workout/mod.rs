//! Workout module - training sessions and progress statistics.

mod errors;
mod session;
mod stats;

pub use errors::WorkoutError;
pub use session::{
    format_duration, NewWorkoutSession, WorkoutMetrics, WorkoutSession, WorkoutStatus,
};
pub use stats::{current_streak, TrainerStats, MAX_STREAK_LOOKBACK_DAYS};
