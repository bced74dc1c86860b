//! HTTP adapter for the exercise library and workout programs.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    EditionPlanResponse, ExerciseDetailResponse, ExerciseItemResponse, LanguageParam,
    ProgramDetailResponse, ProgramSummaryResponse,
};
pub use handlers::{CatalogApiError, CatalogHandlers};
pub use routes::catalog_routes;
