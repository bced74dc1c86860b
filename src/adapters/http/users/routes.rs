//! HTTP routes for user endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    authenticate, change_language, complete_onboarding, get_profile, save_onboarding_step,
    submit_questionnaire, update_profile, UserHandlers,
};

/// Sign-in, onboarding and profile routes, relative to `/api`.
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/users/auth", post(authenticate))
        .route("/users/onboarding/save", post(save_onboarding_step))
        .route("/users/onboarding/complete", post(complete_onboarding))
        .route("/questionnaire/submit", post(submit_questionnaire))
        .route("/users/profile", get(get_profile).patch(update_profile))
        .route("/users/settings/language", post(change_language))
        .with_state(handlers)
}
