//! HTTP handlers for user endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{NaiveDate, Utc};

use crate::adapters::http::error::api_error;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::users::{
    ChangeLanguageCommand, ChangeLanguageHandler, CompleteOnboardingCommand,
    CompleteOnboardingHandler, GetProfileHandler, GetProfileQuery, SaveOnboardingStepCommand,
    SaveOnboardingStepHandler, SubmitQuestionnaireCommand, SubmitQuestionnaireHandler,
    TelegramAuthCommand, TelegramAuthHandler, UpdateProfileCommand, UpdateProfileHandler,
};
use crate::domain::profile::ProfileError;

use super::dto::{
    AuthRequest, AuthResponse, CompleteOnboardingRequest, LanguageRequest, OnboardingStepRequest,
    ProfileResponse, QuestionnaireRequest, UpdateProfileRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct UserHandlers {
    pub auth: Arc<TelegramAuthHandler>,
    pub save_step: Arc<SaveOnboardingStepHandler>,
    pub complete_onboarding: Arc<CompleteOnboardingHandler>,
    pub submit_questionnaire: Arc<SubmitQuestionnaireHandler>,
    pub get_profile: Arc<GetProfileHandler>,
    pub update_profile: Arc<UpdateProfileHandler>,
    pub change_language: Arc<ChangeLanguageHandler>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/users/auth - Sign in from the Mini App
pub async fn authenticate(
    State(handlers): State<UserHandlers>,
    Json(req): Json<AuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ProfileApiError> {
    let result = handlers
        .auth
        .handle(TelegramAuthCommand {
            init_data: req.init_data,
            telegram_id: req.telegram_id,
            username: req.username,
            first_name: req.first_name,
        })
        .await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(AuthResponse::new(result, today()))))
}

/// POST /api/users/onboarding/save - Store one questionnaire answer
pub async fn save_onboarding_step(
    State(handlers): State<UserHandlers>,
    Json(req): Json<OnboardingStepRequest>,
) -> Result<Json<ProfileResponse>, ProfileApiError> {
    let profile = handlers
        .save_step
        .handle(SaveOnboardingStepCommand {
            telegram_id: req.telegram_id,
            step: req.step,
            value: req.value,
        })
        .await?;
    Ok(Json(ProfileResponse::new(profile, today())))
}

/// POST /api/users/onboarding/complete
pub async fn complete_onboarding(
    State(handlers): State<UserHandlers>,
    Json(req): Json<CompleteOnboardingRequest>,
) -> Result<Json<ProfileResponse>, ProfileApiError> {
    let profile = handlers
        .complete_onboarding
        .handle(CompleteOnboardingCommand {
            telegram_id: req.telegram_id,
        })
        .await?;
    Ok(Json(ProfileResponse::new(profile, today())))
}

/// POST /api/questionnaire/submit - All answers at once
pub async fn submit_questionnaire(
    State(handlers): State<UserHandlers>,
    Json(req): Json<QuestionnaireRequest>,
) -> Result<Json<ProfileResponse>, ProfileApiError> {
    let questionnaire = req.questionnaire().map_err(ProfileError::from)?;
    let profile = handlers
        .submit_questionnaire
        .handle(SubmitQuestionnaireCommand {
            telegram_id: req.telegram_id,
            username: req.username,
            first_name: req.first_name,
            questionnaire,
        })
        .await?;
    Ok(Json(ProfileResponse::new(profile, today())))
}

/// GET /api/users/profile
pub async fn get_profile(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ProfileResponse>, ProfileApiError> {
    let profile = handlers
        .get_profile
        .handle(GetProfileQuery { user_id: user.id })
        .await?;
    Ok(Json(ProfileResponse::new(profile, today())))
}

/// PATCH /api/users/profile
pub async fn update_profile(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ProfileApiError> {
    let changes = req.changes().map_err(ProfileError::from)?;
    let profile = handlers
        .update_profile
        .handle(UpdateProfileCommand {
            user_id: user.id,
            changes,
        })
        .await?;
    Ok(Json(ProfileResponse::new(profile, today())))
}

/// POST /api/users/settings/language
pub async fn change_language(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<ProfileResponse>, ProfileApiError> {
    let profile = handlers
        .change_language
        .handle(ChangeLanguageCommand {
            user_id: user.id,
            language: req.language,
        })
        .await?;
    Ok(Json(ProfileResponse::new(profile, today())))
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

api_error!(
    /// HTTP face of [`ProfileError`].
    ProfileApiError,
    ProfileError
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use axum::response::IntoResponse;

    #[test]
    fn not_found_is_404() {
        let response = ProfileApiError(ProfileError::not_found(UserId::new(1))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_is_401() {
        let response =
            ProfileApiError(ProfileError::Unauthorized("bad init data".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn infrastructure_is_500() {
        let response =
            ProfileApiError(ProfileError::infrastructure("pool timed out")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
