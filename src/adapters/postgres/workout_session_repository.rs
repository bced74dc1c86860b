//! PostgreSQL implementation of WorkoutSessionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{parse_column, timestamp};
use crate::domain::foundation::{DomainError, EditionId, ErrorCode, UserId, WorkoutSessionId};
use crate::domain::workout::{NewWorkoutSession, WorkoutMetrics, WorkoutSession};
use crate::ports::WorkoutSessionRepository;

const SELECT_SESSION: &str = r#"
    SELECT id, user_id, edition_id, day_number, status, duration_seconds,
           exercises_completed, total_reps, total_weight, total_calories,
           started_at, completed_at
    FROM workout_sessions
"#;

pub struct PostgresWorkoutSessionRepository {
    pool: PgPool,
}

impl PostgresWorkoutSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: i64,
    user_id: i64,
    edition_id: i64,
    day_number: i32,
    status: String,
    duration_seconds: i32,
    exercises_completed: i32,
    total_reps: i32,
    total_weight: Decimal,
    total_calories: Decimal,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<SessionRow> for WorkoutSession {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(WorkoutSession {
            id: WorkoutSessionId::new(row.id),
            user_id: UserId::new(row.user_id),
            edition_id: EditionId::new(row.edition_id),
            day_number: row.day_number,
            status: parse_column("status", &row.status)?,
            metrics: WorkoutMetrics {
                duration_seconds: row.duration_seconds,
                exercises_completed: row.exercises_completed,
                total_reps: row.total_reps,
                total_weight: row.total_weight,
                total_calories: row.total_calories,
            },
            started_at: timestamp(row.started_at),
            completed_at: row.completed_at.map(timestamp),
        })
    }
}

#[async_trait]
impl WorkoutSessionRepository for PostgresWorkoutSessionRepository {
    #[tracing::instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn create(&self, session: NewWorkoutSession) -> Result<WorkoutSession, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO workout_sessions (user_id, edition_id, day_number, status, started_at)
            VALUES ($1, $2, $3, 'in_progress', $4)
            RETURNING id
            "#,
        )
        .bind(session.user_id.as_i64())
        .bind(session.edition_id.as_i64())
        .bind(session.day_number)
        .bind(session.started_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to start workout", e))?;

        Ok(session.into_session(WorkoutSessionId::new(id)))
    }

    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE workout_sessions SET
                status = $2,
                duration_seconds = $3,
                exercises_completed = $4,
                total_reps = $5,
                total_weight = $6,
                total_calories = $7,
                completed_at = $8
            WHERE id = $1
            "#,
        )
        .bind(session.id.as_i64())
        .bind(session.status.as_str())
        .bind(session.metrics.duration_seconds)
        .bind(session.metrics.exercises_completed)
        .bind(session.metrics.total_reps)
        .bind(session.metrics.total_weight)
        .bind(session.metrics.total_calories)
        .bind(session.completed_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update workout", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::WorkoutSessionNotFound,
                format!("Workout session {} not found", session.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: WorkoutSessionId) -> Result<Option<WorkoutSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SESSION))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load workout", e))?;

        row.map(WorkoutSession::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<WorkoutSession>, DomainError> {
        let rows: Vec<SessionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY started_at DESC, id DESC",
            SELECT_SESSION
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list workouts", e))?;

        rows.into_iter().map(WorkoutSession::try_from).collect()
    }
}
