//! HTTP handlers for workout endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::adapters::http::error::api_error;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::workouts::{
    AbandonWorkoutCommand, AbandonWorkoutHandler, CompleteWorkoutCommand, CompleteWorkoutHandler,
    GetTrainerStatsHandler, GetTrainerStatsQuery, GetWorkoutHistoryHandler,
    GetWorkoutHistoryQuery, StartWorkoutCommand, StartWorkoutHandler,
};
use crate::domain::foundation::{EditionId, WorkoutSessionId};
use crate::domain::workout::WorkoutError;

use super::dto::{
    CompleteWorkoutRequest, HistoryParams, StartWorkoutRequest, TrainerStatsResponse,
    WorkoutSessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct WorkoutHandlers {
    pub start: Arc<StartWorkoutHandler>,
    pub complete: Arc<CompleteWorkoutHandler>,
    pub abandon: Arc<AbandonWorkoutHandler>,
    pub stats: Arc<GetTrainerStatsHandler>,
    pub history: Arc<GetWorkoutHistoryHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/workouts/start
pub async fn start_workout(
    State(handlers): State<WorkoutHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<StartWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutSessionResponse>), WorkoutApiError> {
    let session = handlers
        .start
        .handle(StartWorkoutCommand {
            user_id: user.id,
            edition_id: EditionId::new(req.edition_id),
            day_number: req.day_number,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// POST /api/workouts/:id/complete
pub async fn complete_workout(
    State(handlers): State<WorkoutHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<i64>,
    Json(req): Json<CompleteWorkoutRequest>,
) -> Result<Json<WorkoutSessionResponse>, WorkoutApiError> {
    let session = handlers
        .complete
        .handle(CompleteWorkoutCommand {
            user_id: user.id,
            session_id: WorkoutSessionId::new(session_id),
            metrics: req.into(),
        })
        .await?;
    Ok(Json(session.into()))
}

/// POST /api/workouts/:id/abandon
pub async fn abandon_workout(
    State(handlers): State<WorkoutHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<i64>,
) -> Result<Json<WorkoutSessionResponse>, WorkoutApiError> {
    let session = handlers
        .abandon
        .handle(AbandonWorkoutCommand {
            user_id: user.id,
            session_id: WorkoutSessionId::new(session_id),
        })
        .await?;
    Ok(Json(session.into()))
}

/// GET /api/workouts/stats
pub async fn trainer_stats(
    State(handlers): State<WorkoutHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<TrainerStatsResponse>, WorkoutApiError> {
    let stats = handlers
        .stats
        .handle(GetTrainerStatsQuery {
            user_id: user.id,
            today: Utc::now().date_naive(),
        })
        .await?;
    Ok(Json(stats.into()))
}

/// GET /api/workouts/history?limit=N
pub async fn workout_history(
    State(handlers): State<WorkoutHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<WorkoutSessionResponse>>, WorkoutApiError> {
    let sessions = handlers
        .history
        .handle(GetWorkoutHistoryQuery {
            user_id: user.id,
            limit: params.limit,
        })
        .await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

api_error!(WorkoutApiError, WorkoutError);
