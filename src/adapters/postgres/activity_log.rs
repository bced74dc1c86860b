//! PostgreSQL implementation of ActivityLog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::activity::UserActivity;
use crate::domain::foundation::DomainError;
use crate::ports::ActivityLog;

pub struct PostgresActivityLog {
    pool: PgPool,
}

impl PostgresActivityLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLog for PostgresActivityLog {
    async fn record(&self, activity: UserActivity) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_activities (id, user_id, activity_type, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(activity.id.as_uuid())
        .bind(activity.user_id.as_i64())
        .bind(activity.kind.as_str())
        .bind(&activity.metadata)
        .bind(activity.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to record activity", e))?;

        Ok(())
    }
}
