//! HTTP routes for catalog endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    get_edition, get_exercise, get_program, list_exercises, list_exercises_by_muscle,
    list_muscle_groups, list_programs, CatalogHandlers,
};

/// Exercise library and program routes, relative to `/api`.
pub fn catalog_routes(handlers: CatalogHandlers) -> Router {
    Router::new()
        .route("/exercises", get(list_exercises))
        .route("/exercises/muscle-groups", get(list_muscle_groups))
        .route("/exercises/by-muscle/:muscle", get(list_exercises_by_muscle))
        .route("/exercises/:id", get(get_exercise))
        .route("/programs", get(list_programs))
        .route("/programs/:id", get(get_program))
        .route("/editions/:id", get(get_edition))
        .with_state(handlers)
}
