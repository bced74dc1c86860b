//! Activity module - append-only log of notable user actions.
//!
//! Entries feed funnel analysis (bot start → onboarding → payment) and are never
//! updated once written.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ActivityId, Timestamp, UserId, ValidationError};

/// Kinds of tracked user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    BotStart,
    OnboardingStarted,
    OnboardingCompleted,
    SubscriptionPageViewed,
    PaymentInitiated,
    PaymentCompleted,
    ProgramViewed,
    WorkoutStarted,
    WorkoutCompleted,
    ExerciseViewed,
    ExerciseFavourited,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::BotStart => "bot_start",
            ActivityKind::OnboardingStarted => "onboarding_started",
            ActivityKind::OnboardingCompleted => "onboarding_completed",
            ActivityKind::SubscriptionPageViewed => "subscription_page_viewed",
            ActivityKind::PaymentInitiated => "payment_initiated",
            ActivityKind::PaymentCompleted => "payment_completed",
            ActivityKind::ProgramViewed => "program_viewed",
            ActivityKind::WorkoutStarted => "workout_started",
            ActivityKind::WorkoutCompleted => "workout_completed",
            ActivityKind::ExerciseViewed => "exercise_viewed",
            ActivityKind::ExerciseFavourited => "exercise_favourited",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "bot_start" => ActivityKind::BotStart,
            "onboarding_started" => ActivityKind::OnboardingStarted,
            "onboarding_completed" => ActivityKind::OnboardingCompleted,
            "subscription_page_viewed" => ActivityKind::SubscriptionPageViewed,
            "payment_initiated" => ActivityKind::PaymentInitiated,
            "payment_completed" => ActivityKind::PaymentCompleted,
            "program_viewed" => ActivityKind::ProgramViewed,
            "workout_started" => ActivityKind::WorkoutStarted,
            "workout_completed" => ActivityKind::WorkoutCompleted,
            "exercise_viewed" => ActivityKind::ExerciseViewed,
            "exercise_favourited" => ActivityKind::ExerciseFavourited,
            other => {
                return Err(ValidationError::invalid_format(
                    "activity_type",
                    format!("unknown activity '{}'", other),
                ))
            }
        };
        Ok(kind)
    }
}

/// One logged action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub id: ActivityId,
    pub user_id: UserId,
    pub kind: ActivityKind,
    pub metadata: Value,
    pub created_at: Timestamp,
}

impl UserActivity {
    pub fn new(user_id: UserId, kind: ActivityKind, metadata: Value) -> Self {
        Self {
            id: ActivityId::new(),
            user_id,
            kind,
            metadata,
            created_at: Timestamp::now(),
        }
    }

    /// Entry without extra metadata.
    pub fn bare(user_id: UserId, kind: ActivityKind) -> Self {
        Self::new(user_id, kind, Value::Object(Default::default()))
    }
}
