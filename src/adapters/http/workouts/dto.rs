//! HTTP DTOs for workout endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::workout::{format_duration, TrainerStats, WorkoutMetrics, WorkoutSession};

#[derive(Debug, Clone, Deserialize)]
pub struct StartWorkoutRequest {
    pub edition_id: i64,
    pub day_number: i32,
}

/// Totals reported by the Mini App; omitted counters are zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompleteWorkoutRequest {
    pub duration_seconds: i32,
    pub exercises_completed: i32,
    pub total_reps: i32,
    pub total_weight: Decimal,
    pub total_calories: Decimal,
}

impl From<CompleteWorkoutRequest> for WorkoutMetrics {
    fn from(req: CompleteWorkoutRequest) -> Self {
        WorkoutMetrics {
            duration_seconds: req.duration_seconds,
            exercises_completed: req.exercises_completed,
            total_reps: req.total_reps,
            total_weight: req.total_weight,
            total_calories: req.total_calories,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSessionResponse {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub duration_display: String,
}

impl From<WorkoutSession> for WorkoutSessionResponse {
    fn from(session: WorkoutSession) -> Self {
        Self {
            duration_display: format_duration(session.metrics.duration_seconds),
            session,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainerStatsResponse {
    pub total_workouts: i64,
    pub total_duration_hours: Decimal,
    pub total_calories: i64,
    pub current_streak: u32,
}

impl From<TrainerStats> for TrainerStatsResponse {
    fn from(stats: TrainerStats) -> Self {
        Self {
            total_workouts: stats.total_workouts,
            total_duration_hours: stats.total_duration_hours,
            total_calories: stats.total_calories,
            current_streak: stats.current_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_metrics_default_to_zero() {
        let req: CompleteWorkoutRequest =
            serde_json::from_value(serde_json::json!({"duration_seconds": 1800})).unwrap();
        let metrics = WorkoutMetrics::from(req);
        assert_eq!(metrics.duration_seconds, 1800);
        assert_eq!(metrics.total_reps, 0);
        assert_eq!(metrics.total_calories, Decimal::ZERO);
    }
}
