//! Profile module - users, questionnaire answers and Telegram identity.

mod errors;
mod init_data;
mod onboarding;
mod user_profile;

pub use errors::ProfileError;
pub use init_data::{sign_init_data, verify_init_data, WebAppUser};
pub use onboarding::{OnboardingAnswer, Questionnaire, MAX_WORKOUT_DAYS, MIN_WORKOUT_DAYS};
pub use user_profile::{
    ExperienceLevel, FitnessGoal, Gender, Language, Motivation, NewUserProfile, ProfileChanges,
    UnitSystem, UserProfile, DEFAULT_PROFILE_NAME,
};
