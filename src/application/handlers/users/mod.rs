//! User handlers - Telegram sign-in, onboarding and profile settings.

mod change_language;
mod complete_onboarding;
mod get_profile;
mod save_onboarding_step;
mod submit_questionnaire;
mod telegram_auth;
mod update_profile;

pub use change_language::{ChangeLanguageCommand, ChangeLanguageHandler};
pub use complete_onboarding::{CompleteOnboardingCommand, CompleteOnboardingHandler};
pub use get_profile::{GetProfileHandler, GetProfileQuery};
pub use save_onboarding_step::{SaveOnboardingStepCommand, SaveOnboardingStepHandler};
pub use submit_questionnaire::{SubmitQuestionnaireCommand, SubmitQuestionnaireHandler};
pub use telegram_auth::{InitDataPolicy, TelegramAuthCommand, TelegramAuthHandler, TelegramAuthResult};
pub use update_profile::{UpdateProfileCommand, UpdateProfileHandler};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::profile::{NewUserProfile, UserProfile};
use crate::ports::ProfileRepository;

/// Finds the profile for the Telegram account or creates it.
///
/// Returns the profile and whether it was created by this call. A concurrent
/// insert for the same account is resolved by reading the winner's row.
pub(crate) async fn get_or_create_profile(
    profiles: &dyn ProfileRepository,
    new_profile: NewUserProfile,
) -> Result<(UserProfile, bool), DomainError> {
    let telegram_id = new_profile.telegram_id;
    if let Some(existing) = profiles.find_by_telegram_id(telegram_id).await? {
        return Ok((existing, false));
    }
    match profiles.create(new_profile).await {
        Ok(created) => {
            tracing::info!(user_id = %created.id, telegram_id = %telegram_id, "created user profile");
            Ok((created, true))
        }
        Err(err) if err.code == ErrorCode::UserExists => {
            let existing = profiles.find_by_telegram_id(telegram_id).await?.ok_or_else(|| {
                DomainError::new(ErrorCode::InternalError, "profile vanished after conflict")
            })?;
            Ok((existing, false))
        }
        Err(err) => Err(err),
    }
}
