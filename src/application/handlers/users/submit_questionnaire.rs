//! SubmitQuestionnaireHandler - stores the whole questionnaire in one request.

use std::sync::Arc;

use super::get_or_create_profile;
use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::foundation::{TelegramId, Timestamp};
use crate::domain::profile::{NewUserProfile, ProfileError, Questionnaire, UserProfile};
use crate::ports::{ActivityLog, ProfileRepository};

#[derive(Debug, Clone)]
pub struct SubmitQuestionnaireCommand {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub questionnaire: Questionnaire,
}

pub struct SubmitQuestionnaireHandler {
    profiles: Arc<dyn ProfileRepository>,
    activity: Arc<dyn ActivityLog>,
}

impl SubmitQuestionnaireHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, activity: Arc<dyn ActivityLog>) -> Self {
        Self { profiles, activity }
    }

    pub async fn handle(&self, cmd: SubmitQuestionnaireCommand) -> Result<UserProfile, ProfileError> {
        // 1. Validate the form as a whole
        let telegram_id = TelegramId::new(cmd.telegram_id)?;
        let questionnaire = cmd.questionnaire.validated()?;

        // 2. Load or create the profile
        let (mut profile, _) = get_or_create_profile(
            self.profiles.as_ref(),
            NewUserProfile::new(telegram_id, cmd.username, cmd.first_name),
        )
        .await?;

        // 3. Apply every answer and finish onboarding
        let now = Timestamp::now();
        for answer in questionnaire.answers() {
            answer.apply_to(&mut profile, now);
        }
        profile.complete_onboarding(now);
        self.profiles.update(&profile).await?;

        record_activity(
            self.activity.as_ref(),
            UserActivity::bare(profile.id, ActivityKind::OnboardingCompleted),
        )
        .await;

        tracing::info!(user_id = %profile.id, "questionnaire submitted");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryActivityLog, InMemoryProfileRepository};
    use crate::domain::profile::{ExperienceLevel, FitnessGoal, Gender, Motivation};
    use rust_decimal::Decimal;

    fn questionnaire(days: u8) -> Questionnaire {
        Questionnaire {
            gender: Gender::Male,
            experience: ExperienceLevel::Beginner,
            goal: FitnessGoal::LoseWeight,
            motivations: vec![Motivation::HealthyLifestyle],
            workout_days: days,
            weight: Decimal::new(905, 1),
            height: Decimal::new(178, 0),
        }
    }

    #[tokio::test]
    async fn stores_answers_and_completes_onboarding() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let handler =
            SubmitQuestionnaireHandler::new(profiles.clone(), Arc::new(InMemoryActivityLog::new()));

        let profile = handler
            .handle(SubmitQuestionnaireCommand {
                telegram_id: 321,
                username: None,
                first_name: Some("Bek".into()),
                questionnaire: questionnaire(3),
            })
            .await
            .unwrap();

        assert!(profile.onboarding_completed);
        assert_eq!(profile.name, "Bek");
        assert_eq!(profile.workout_days_per_week, Some(3));
        assert_eq!(profile.weight, Some(Decimal::new(905, 1)));
        assert_eq!(profiles.all().len(), 1);
    }

    #[tokio::test]
    async fn invalid_days_store_nothing() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let handler =
            SubmitQuestionnaireHandler::new(profiles.clone(), Arc::new(InMemoryActivityLog::new()));

        let result = handler
            .handle(SubmitQuestionnaireCommand {
                telegram_id: 322,
                username: None,
                first_name: None,
                questionnaire: questionnaire(0),
            })
            .await;

        assert!(result.is_err());
        assert!(profiles.all().is_empty());
    }
}
