//! SaveOnboardingStepHandler - stores one questionnaire answer.

use serde_json::{json, Value};
use std::sync::Arc;

use super::get_or_create_profile;
use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::foundation::{TelegramId, Timestamp};
use crate::domain::profile::{NewUserProfile, OnboardingAnswer, ProfileError, UserProfile};
use crate::ports::{ActivityLog, ProfileRepository};

/// One `{step, value}` pair posted by the questionnaire screen.
#[derive(Debug, Clone)]
pub struct SaveOnboardingStepCommand {
    pub telegram_id: i64,
    pub step: String,
    pub value: Value,
}

/// Handler for single questionnaire steps.
///
/// Every call is an independent write of one field, so replaying a step
/// leaves the profile unchanged.
pub struct SaveOnboardingStepHandler {
    profiles: Arc<dyn ProfileRepository>,
    activity: Arc<dyn ActivityLog>,
}

impl SaveOnboardingStepHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, activity: Arc<dyn ActivityLog>) -> Self {
        Self { profiles, activity }
    }

    pub async fn handle(&self, cmd: SaveOnboardingStepCommand) -> Result<UserProfile, ProfileError> {
        // 1. Parse before touching storage so bad input creates nothing
        let telegram_id = TelegramId::new(cmd.telegram_id)?;
        let answer = OnboardingAnswer::parse(&cmd.step, &cmd.value)?;

        // 2. Load or create the profile
        let (mut profile, _) = get_or_create_profile(
            self.profiles.as_ref(),
            NewUserProfile::new(telegram_id, None, None),
        )
        .await?;
        let first_answer = !profile.has_onboarding_answers();

        // 3. Write the answer
        answer.apply_to(&mut profile, Timestamp::now());
        self.profiles.update(&profile).await?;

        if first_answer {
            record_activity(
                self.activity.as_ref(),
                UserActivity::new(
                    profile.id,
                    ActivityKind::OnboardingStarted,
                    json!({ "step": cmd.step.trim() }),
                ),
            )
            .await;
        }

        tracing::debug!(user_id = %profile.id, step = %cmd.step.trim(), "saved onboarding step");
        Ok(profile)
    }
}
