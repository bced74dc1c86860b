//! PostgreSQL implementation of ProfileRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{is_unique_violation, parse_column, timestamp};
use crate::domain::foundation::{DomainError, ErrorCode, TelegramId, Timestamp, UserId};
use crate::domain::profile::{Motivation, NewUserProfile, UserProfile};
use crate::ports::ProfileRepository;

const SELECT_USER: &str = r#"
    SELECT id, telegram_id, telegram_username, is_premium, name, gender, birth_date,
           weight, height, experience_level, fitness_goal, workout_days_per_week,
           unit_system, language, motivations, onboarding_completed, created_at, updated_at
    FROM users
"#;

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    telegram_id: i64,
    telegram_username: Option<String>,
    is_premium: bool,
    name: String,
    gender: Option<String>,
    birth_date: Option<NaiveDate>,
    weight: Option<Decimal>,
    height: Option<Decimal>,
    experience_level: Option<String>,
    fitness_goal: Option<String>,
    workout_days_per_week: Option<i16>,
    unit_system: String,
    language: String,
    motivations: Vec<String>,
    onboarding_completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let telegram_id = TelegramId::new(row.telegram_id)
            .map_err(|e| DomainError::database("Invalid telegram_id", e))?;
        let workout_days_per_week = row
            .workout_days_per_week
            .map(u8::try_from)
            .transpose()
            .map_err(|e| DomainError::database("Invalid workout_days_per_week", e))?;
        let mut motivations = Vec::with_capacity(row.motivations.len());
        for value in &row.motivations {
            motivations.push(parse_column::<Motivation>("motivation", value)?);
        }

        Ok(UserProfile {
            id: UserId::new(row.id),
            telegram_id,
            telegram_username: row.telegram_username,
            is_premium: row.is_premium,
            name: row.name,
            gender: row.gender.as_deref().map(|v| parse_column("gender", v)).transpose()?,
            birth_date: row.birth_date,
            weight: row.weight,
            height: row.height,
            experience_level: row
                .experience_level
                .as_deref()
                .map(|v| parse_column("experience_level", v))
                .transpose()?,
            fitness_goal: row
                .fitness_goal
                .as_deref()
                .map(|v| parse_column("fitness_goal", v))
                .transpose()?,
            workout_days_per_week,
            unit_system: parse_column("unit_system", &row.unit_system)?,
            language: parse_column("language", &row.language)?,
            motivations,
            onboarding_completed: row.onboarding_completed,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        })
    }
}

fn motivation_values(profile: &UserProfile) -> Vec<String> {
    profile.motivations.iter().map(|m| m.as_str().to_string()).collect()
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    #[tracing::instrument(skip(self, profile), fields(telegram_id = %profile.telegram_id))]
    async fn create(&self, profile: NewUserProfile) -> Result<UserProfile, DomainError> {
        let now = Timestamp::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (telegram_id, telegram_username, is_premium, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(profile.telegram_id.as_i64())
        .bind(&profile.telegram_username)
        .bind(profile.is_premium)
        .bind(&profile.name)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "users_telegram_id_key") {
                return DomainError::new(
                    ErrorCode::UserExists,
                    format!("Profile for telegram id {} already exists", profile.telegram_id),
                );
            }
            DomainError::database("Failed to create profile", e)
        })?;

        Ok(profile.into_profile(UserId::new(id), now))
    }

    #[tracing::instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                telegram_username = $2,
                is_premium = $3,
                name = $4,
                gender = $5,
                birth_date = $6,
                weight = $7,
                height = $8,
                experience_level = $9,
                fitness_goal = $10,
                workout_days_per_week = $11,
                unit_system = $12,
                language = $13,
                motivations = $14,
                onboarding_completed = $15,
                updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(profile.id.as_i64())
        .bind(&profile.telegram_username)
        .bind(profile.is_premium)
        .bind(&profile.name)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.birth_date)
        .bind(profile.weight)
        .bind(profile.height)
        .bind(profile.experience_level.map(|l| l.as_str()))
        .bind(profile.fitness_goal.map(|g| g.as_str()))
        .bind(profile.workout_days_per_week.map(i16::from))
        .bind(profile.unit_system.as_str())
        .bind(profile.language.as_str())
        .bind(motivation_values(profile))
        .bind(profile.onboarding_completed)
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update profile", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("Profile {} not found", profile.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load profile", e))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE telegram_id = $1", SELECT_USER))
                .bind(telegram_id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to load profile", e))?;

        row.map(UserProfile::try_from).transpose()
    }
}
