//! PostgreSQL implementation of SubscriptionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{is_unique_violation, timestamp};
use crate::domain::billing::{NewSubscription, Subscription};
use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::ports::SubscriptionRepository;

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT id, user_id, start_date, end_date, is_active, auto_renew, price,
           failed_payment_count, last_failed_at, created_at, updated_at
    FROM subscriptions
"#;

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    user_id: i64,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    is_active: bool,
    auto_renew: bool,
    price: Decimal,
    failed_payment_count: i32,
    last_failed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: SubscriptionId::new(row.id),
            user_id: UserId::new(row.user_id),
            start_date: timestamp(row.start_date),
            end_date: row.end_date.map(timestamp),
            is_active: row.is_active,
            auto_renew: row.auto_renew,
            price: row.price,
            failed_payment_count: row.failed_payment_count,
            last_failed_at: row.last_failed_at.map(timestamp),
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    #[tracing::instrument(skip(self, subscription), fields(user_id = %subscription.user_id))]
    async fn create(&self, subscription: NewSubscription) -> Result<Subscription, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subscriptions (
                user_id, start_date, end_date, is_active, auto_renew, price,
                failed_payment_count, created_at, updated_at
            ) VALUES ($1, $2, $3, TRUE, $4, $5, 0, $2, $2)
            RETURNING id
            "#,
        )
        .bind(subscription.user_id.as_i64())
        .bind(subscription.start_date.as_datetime())
        .bind(subscription.end_date.as_datetime())
        .bind(subscription.auto_renew)
        .bind(subscription.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "subscriptions_user_id_key") {
                return DomainError::new(
                    ErrorCode::SubscriptionExists,
                    "User already has a subscription",
                );
            }
            DomainError::database("Failed to create subscription", e)
        })?;

        Ok(subscription.into_subscription(SubscriptionId::new(id)))
    }

    #[tracing::instrument(skip(self, subscription), fields(subscription_id = %subscription.id))]
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                start_date = $2,
                end_date = $3,
                is_active = $4,
                auto_renew = $5,
                price = $6,
                failed_payment_count = $7,
                last_failed_at = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.as_i64())
        .bind(subscription.start_date.as_datetime())
        .bind(subscription.end_date.map(|t| *t.as_datetime()))
        .bind(subscription.is_active)
        .bind(subscription.auto_renew)
        .bind(subscription.price)
        .bind(subscription.failed_payment_count)
        .bind(subscription.last_failed_at.map(|t| *t.as_datetime()))
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update subscription", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription {} not found", subscription.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SUBSCRIPTION))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to load subscription", e))?;

        Ok(row.map(Subscription::from))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_SUBSCRIPTION))
                .bind(user_id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to load subscription", e))?;

        Ok(row.map(Subscription::from))
    }

    async fn list_active(&self) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE is_active ORDER BY end_date NULLS LAST, id",
            SELECT_SUBSCRIPTION
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list active subscriptions", e))?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }
}
