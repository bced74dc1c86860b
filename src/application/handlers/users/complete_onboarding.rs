//! CompleteOnboardingHandler - marks the questionnaire as finished.

use std::sync::Arc;

use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::foundation::{TelegramId, Timestamp};
use crate::domain::profile::{ProfileError, UserProfile};
use crate::ports::{ActivityLog, ProfileRepository};

#[derive(Debug, Clone)]
pub struct CompleteOnboardingCommand {
    pub telegram_id: i64,
}

pub struct CompleteOnboardingHandler {
    profiles: Arc<dyn ProfileRepository>,
    activity: Arc<dyn ActivityLog>,
}

impl CompleteOnboardingHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, activity: Arc<dyn ActivityLog>) -> Self {
        Self { profiles, activity }
    }

    pub async fn handle(&self, cmd: CompleteOnboardingCommand) -> Result<UserProfile, ProfileError> {
        let telegram_id = TelegramId::new(cmd.telegram_id)?;

        // 1. The profile must exist; completion never creates one
        let mut profile = self
            .profiles
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| ProfileError::not_found_for_telegram(telegram_id))?;

        // 2. Mark complete and persist
        profile.complete_onboarding(Timestamp::now());
        self.profiles.update(&profile).await?;

        // 3. Funnel event
        record_activity(
            self.activity.as_ref(),
            UserActivity::bare(profile.id, ActivityKind::OnboardingCompleted),
        )
        .await;

        tracing::info!(user_id = %profile.id, "onboarding completed");
        Ok(profile)
    }
}
