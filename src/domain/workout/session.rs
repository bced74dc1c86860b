//! Workout session lifecycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    EditionId, StateMachine, Timestamp, UserId, ValidationError, WorkoutSessionId,
};

/// Longest session we accept, in seconds.
const MAX_SESSION_SECONDS: i32 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::InProgress => "in_progress",
            WorkoutStatus::Completed => "completed",
            WorkoutStatus::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(WorkoutStatus::InProgress),
            "completed" => Ok(WorkoutStatus::Completed),
            "abandoned" => Ok(WorkoutStatus::Abandoned),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown workout status '{}'", other),
            )),
        }
    }
}

impl StateMachine for WorkoutStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (WorkoutStatus::InProgress, WorkoutStatus::Completed)
                | (WorkoutStatus::InProgress, WorkoutStatus::Abandoned)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            WorkoutStatus::InProgress => vec![WorkoutStatus::Completed, WorkoutStatus::Abandoned],
            WorkoutStatus::Completed | WorkoutStatus::Abandoned => vec![],
        }
    }
}

/// Totals reported by the client when a workout ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutMetrics {
    pub duration_seconds: i32,
    pub exercises_completed: i32,
    pub total_reps: i32,
    pub total_weight: Decimal,
    pub total_calories: Decimal,
}

impl WorkoutMetrics {
    pub fn validated(self) -> Result<Self, ValidationError> {
        if !(0..=MAX_SESSION_SECONDS).contains(&self.duration_seconds) {
            return Err(ValidationError::out_of_range(
                "duration_seconds",
                0,
                i64::from(MAX_SESSION_SECONDS),
                i64::from(self.duration_seconds),
            ));
        }
        for (field, value) in [
            ("exercises_completed", self.exercises_completed),
            ("total_reps", self.total_reps),
        ] {
            if value < 0 {
                return Err(ValidationError::invalid_format(field, "cannot be negative"));
            }
        }
        if self.total_weight < Decimal::ZERO {
            return Err(ValidationError::invalid_format("total_weight", "cannot be negative"));
        }
        if self.total_calories < Decimal::ZERO {
            return Err(ValidationError::invalid_format("total_calories", "cannot be negative"));
        }
        Ok(self)
    }
}

/// One attempt at a training day of an edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: WorkoutSessionId,
    pub user_id: UserId,
    pub edition_id: EditionId,
    pub day_number: i32,
    pub status: WorkoutStatus,
    pub metrics: WorkoutMetrics,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// Insert data for a freshly started session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutSession {
    pub user_id: UserId,
    pub edition_id: EditionId,
    pub day_number: i32,
    pub started_at: Timestamp,
}

impl NewWorkoutSession {
    pub fn into_session(self, id: WorkoutSessionId) -> WorkoutSession {
        WorkoutSession {
            id,
            user_id: self.user_id,
            edition_id: self.edition_id,
            day_number: self.day_number,
            status: WorkoutStatus::InProgress,
            metrics: WorkoutMetrics::default(),
            started_at: self.started_at,
            completed_at: None,
        }
    }
}

impl WorkoutSession {
    pub fn complete(&mut self, metrics: WorkoutMetrics, now: Timestamp) -> Result<(), ValidationError> {
        let metrics = metrics.validated()?;
        self.status = self.status.transition_to(WorkoutStatus::Completed)?;
        self.metrics = metrics;
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn abandon(&mut self, now: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(WorkoutStatus::Abandoned)?;
        self.metrics.duration_seconds = now
            .duration_since(&self.started_at)
            .num_seconds()
            .clamp(0, i64::from(MAX_SESSION_SECONDS)) as i32;
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.metrics.duration_seconds)
    }
}

/// `H:MM:SS` for an hour or more, `M:SS` below.
pub fn format_duration(total_seconds: i32) -> String {
    let secs = total_seconds.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
