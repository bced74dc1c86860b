//! HTTP DTOs for user endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::users::TelegramAuthResult;
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::profile::{
    ExperienceLevel, FitnessGoal, Gender, Motivation, ProfileChanges, Questionnaire, UnitSystem,
    UserProfile,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Mini App sign-in. `init_data` is the raw `Telegram.WebApp.initData` string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub init_data: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingStepRequest {
    pub telegram_id: i64,
    pub step: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteOnboardingRequest {
    pub telegram_id: i64,
}

/// The whole questionnaire in one request. Choice fields arrive as strings
/// so that unknown values surface as validation errors.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionnaireRequest {
    pub telegram_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    pub gender: String,
    pub experience: String,
    pub goal: String,
    #[serde(default)]
    pub motivations: Vec<String>,
    pub workout_days: u8,
    pub weight: Decimal,
    pub height: Decimal,
}

impl QuestionnaireRequest {
    pub fn questionnaire(&self) -> Result<Questionnaire, ValidationError> {
        Ok(Questionnaire {
            gender: self.gender.parse::<Gender>()?,
            experience: self.experience.parse::<ExperienceLevel>()?,
            goal: self.goal.parse::<FitnessGoal>()?,
            motivations: self
                .motivations
                .iter()
                .map(|m| m.parse::<Motivation>())
                .collect::<Result<_, _>>()?,
            workout_days: self.workout_days,
            weight: self.weight,
            height: self.height,
        })
    }
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub height: Option<Decimal>,
    #[serde(default)]
    pub unit_system: Option<String>,
}

impl UpdateProfileRequest {
    pub fn changes(self) -> Result<ProfileChanges, ValidationError> {
        Ok(ProfileChanges {
            name: self.name,
            gender: self.gender.as_deref().map(str::parse::<Gender>).transpose()?,
            birth_date: self.birth_date,
            weight: self.weight,
            height: self.height,
            unit_system: self
                .unit_system
                .as_deref()
                .map(str::parse::<UnitSystem>)
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub name: String,
    pub is_premium: bool,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<u32>,
    pub weight: Option<Decimal>,
    pub height: Option<Decimal>,
    pub bmi: Option<Decimal>,
    pub experience_level: Option<ExperienceLevel>,
    pub fitness_goal: Option<FitnessGoal>,
    pub workout_days_per_week: Option<u8>,
    pub motivations: Vec<Motivation>,
    pub unit_system: UnitSystem,
    pub language: String,
    pub onboarding_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProfileResponse {
    pub fn new(profile: UserProfile, today: NaiveDate) -> Self {
        Self {
            id: profile.id.as_i64(),
            telegram_id: profile.telegram_id.as_i64(),
            age: profile.age(today),
            bmi: profile.bmi(),
            language: profile.language.as_str().to_string(),
            telegram_username: profile.telegram_username,
            name: profile.name,
            is_premium: profile.is_premium,
            gender: profile.gender,
            birth_date: profile.birth_date,
            weight: profile.weight,
            height: profile.height,
            experience_level: profile.experience_level,
            fitness_goal: profile.fitness_goal,
            workout_days_per_week: profile.workout_days_per_week,
            motivations: profile.motivations,
            unit_system: profile.unit_system,
            onboarding_completed: profile.onboarding_completed,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: ProfileResponse,
    pub onboarding_completed: bool,
    pub redirect_url: String,
    pub created: bool,
}

impl AuthResponse {
    pub fn new(result: TelegramAuthResult, today: NaiveDate) -> Self {
        Self {
            token: result.token,
            onboarding_completed: result.onboarding_completed,
            redirect_url: result.redirect_url.to_string(),
            created: result.created,
            user: ProfileResponse::new(result.profile, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questionnaire_json() -> serde_json::Value {
        serde_json::json!({
            "telegram_id": 42,
            "gender": "male",
            "experience": "beginner",
            "goal": "lose_weight",
            "motivations": ["healthy_lifestyle"],
            "workout_days": 3,
            "weight": 80.5,
            "height": "180"
        })
    }

    #[test]
    fn questionnaire_request_converts() {
        let request: QuestionnaireRequest = serde_json::from_value(questionnaire_json()).unwrap();
        let questionnaire = request.questionnaire().unwrap();
        assert_eq!(questionnaire.gender, Gender::Male);
        assert_eq!(questionnaire.workout_days, 3);
        assert_eq!(questionnaire.height, Decimal::new(180, 0));
    }

    #[test]
    fn unknown_choice_is_a_validation_error() {
        let mut json = questionnaire_json();
        json["gender"] = serde_json::json!("robot");
        let request: QuestionnaireRequest = serde_json::from_value(json).unwrap();
        assert!(request.questionnaire().is_err());
    }

    #[test]
    fn empty_update_changes_nothing() {
        let changes = UpdateProfileRequest::default().changes().unwrap();
        assert_eq!(changes, ProfileChanges::default());
    }

    #[test]
    fn update_rejects_unknown_unit() {
        let request = UpdateProfileRequest {
            unit_system: Some("cubits".to_string()),
            ..Default::default()
        };
        assert!(request.changes().is_err());
    }
}
