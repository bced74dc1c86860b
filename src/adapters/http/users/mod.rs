//! HTTP adapter for sign-in, onboarding and profile endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AuthRequest, AuthResponse, CompleteOnboardingRequest, LanguageRequest, OnboardingStepRequest,
    ProfileResponse, QuestionnaireRequest, UpdateProfileRequest,
};
pub use handlers::{ProfileApiError, UserHandlers};
pub use routes::user_routes;
