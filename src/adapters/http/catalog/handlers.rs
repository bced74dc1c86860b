//! HTTP handlers for catalog endpoints.
//!
//! Browsing is public. When a bearer token is present the exercise endpoints
//! also report whether each exercise is in the caller's favorites.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::adapters::http::error::api_error;
use crate::adapters::http::middleware::OptionalAuth;
use crate::application::handlers::catalog::{
    GetEditionPlanHandler, GetEditionPlanQuery, GetExerciseDetailHandler, GetExerciseDetailQuery,
    GetProgramHandler, GetProgramQuery, ListExercisesHandler, ListExercisesQuery,
    ListMuscleGroupsHandler, ListProgramsHandler,
};
use crate::domain::catalog::{CatalogError, MuscleGroup};
use crate::domain::foundation::{EditionId, ExerciseId, ProgramId};

use super::dto::{
    EditionPlanResponse, ExerciseDetailResponse, ExerciseItemResponse, LanguageParam,
    ProgramDetailResponse, ProgramSummaryResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CatalogHandlers {
    pub muscle_groups: Arc<ListMuscleGroupsHandler>,
    pub exercises: Arc<ListExercisesHandler>,
    pub exercise_detail: Arc<GetExerciseDetailHandler>,
    pub programs: Arc<ListProgramsHandler>,
    pub program: Arc<GetProgramHandler>,
    pub edition_plan: Arc<GetEditionPlanHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/exercises/muscle-groups
pub async fn list_muscle_groups(
    State(handlers): State<CatalogHandlers>,
) -> Result<Json<Vec<MuscleGroup>>, CatalogApiError> {
    Ok(Json(handlers.muscle_groups.handle().await?))
}

async fn exercise_list(
    handlers: &CatalogHandlers,
    query: ListExercisesQuery,
) -> Result<Json<Vec<ExerciseItemResponse>>, CatalogApiError> {
    let items = handlers.exercises.handle(query).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// GET /api/exercises
pub async fn list_exercises(
    State(handlers): State<CatalogHandlers>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<Vec<ExerciseItemResponse>>, CatalogApiError> {
    let query = ListExercisesQuery {
        muscle: None,
        user_id: user.map(|u| u.id),
    };
    exercise_list(&handlers, query).await
}

/// GET /api/exercises/by-muscle/:muscle
pub async fn list_exercises_by_muscle(
    State(handlers): State<CatalogHandlers>,
    OptionalAuth(user): OptionalAuth,
    Path(muscle): Path<String>,
) -> Result<Json<Vec<ExerciseItemResponse>>, CatalogApiError> {
    let query = ListExercisesQuery {
        muscle: Some(muscle),
        user_id: user.map(|u| u.id),
    };
    exercise_list(&handlers, query).await
}

/// GET /api/exercises/:id
pub async fn get_exercise(
    State(handlers): State<CatalogHandlers>,
    OptionalAuth(user): OptionalAuth,
    Path(exercise_id): Path<i64>,
    Query(param): Query<LanguageParam>,
) -> Result<Json<ExerciseDetailResponse>, CatalogApiError> {
    let language = param.language();
    let view = handlers
        .exercise_detail
        .handle(GetExerciseDetailQuery {
            exercise_id: ExerciseId::new(exercise_id),
            user_id: user.map(|u| u.id),
            language,
        })
        .await?;
    Ok(Json(ExerciseDetailResponse::new(view, language)))
}

/// GET /api/programs
pub async fn list_programs(
    State(handlers): State<CatalogHandlers>,
) -> Result<Json<Vec<ProgramSummaryResponse>>, CatalogApiError> {
    let programs = handlers.programs.handle().await?;
    Ok(Json(programs.into_iter().map(Into::into).collect()))
}

/// GET /api/programs/:id
pub async fn get_program(
    State(handlers): State<CatalogHandlers>,
    OptionalAuth(user): OptionalAuth,
    Path(program_id): Path<i64>,
) -> Result<Json<ProgramDetailResponse>, CatalogApiError> {
    let detail = handlers
        .program
        .handle(GetProgramQuery {
            program_id: ProgramId::new(program_id),
            user_id: user.map(|u| u.id),
        })
        .await?;
    Ok(Json(detail.into()))
}

/// GET /api/editions/:id
pub async fn get_edition(
    State(handlers): State<CatalogHandlers>,
    Path(edition_id): Path<i64>,
) -> Result<Json<EditionPlanResponse>, CatalogApiError> {
    let plan = handlers
        .edition_plan
        .handle(GetEditionPlanQuery {
            edition_id: EditionId::new(edition_id),
        })
        .await?;
    Ok(Json(plan.into()))
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

api_error!(CatalogApiError, CatalogError);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn missing_edition_is_404() {
        let response =
            CatalogApiError(CatalogError::EditionNotFound(EditionId::new(3))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
