//! PostgreSQL implementation of PaymentMethodRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::timestamp;
use crate::domain::billing::{CardDetails, PaymentMethod};
use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentMethodId, Timestamp, UserId,
};
use crate::ports::PaymentMethodRepository;

const METHOD_COLUMNS: &str = r#"
    id, user_id, card_token, card_last_four, card_type, expiry_month, expiry_year,
    is_active, created_at, updated_at
"#;

pub struct PostgresPaymentMethodRepository {
    pool: PgPool,
}

impl PostgresPaymentMethodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentMethodRow {
    id: i64,
    user_id: i64,
    card_token: String,
    card_last_four: String,
    card_type: String,
    expiry_month: i16,
    expiry_year: i16,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentMethodRow> for PaymentMethod {
    type Error = DomainError;

    fn try_from(row: PaymentMethodRow) -> Result<Self, Self::Error> {
        let expiry_month = u32::try_from(row.expiry_month)
            .map_err(|e| DomainError::database("Invalid expiry_month", e))?;
        Ok(PaymentMethod {
            id: PaymentMethodId::new(row.id),
            user_id: UserId::new(row.user_id),
            card_token: row.card_token,
            card_last_four: row.card_last_four,
            card_type: row.card_type,
            expiry_month,
            expiry_year: i32::from(row.expiry_year),
            is_active: row.is_active,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        })
    }
}

fn month_column(month: u32) -> Result<i16, DomainError> {
    i16::try_from(month).map_err(|e| DomainError::database("Invalid expiry_month", e))
}

fn year_column(year: i32) -> Result<i16, DomainError> {
    i16::try_from(year).map_err(|e| DomainError::database("Invalid expiry_year", e))
}

#[async_trait]
impl PaymentMethodRepository for PostgresPaymentMethodRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<PaymentMethod>, DomainError> {
        let row: Option<PaymentMethodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_methods WHERE user_id = $1",
            METHOD_COLUMNS
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load payment method", e))?;

        row.map(PaymentMethod::try_from).transpose()
    }

    #[tracing::instrument(skip(self, card), fields(user_id = %user_id, card_type = %card.card_type))]
    async fn upsert(
        &self,
        user_id: UserId,
        card: CardDetails,
        now: Timestamp,
    ) -> Result<PaymentMethod, DomainError> {
        let row: PaymentMethodRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO payment_methods (
                user_id, card_token, card_last_four, card_type, expiry_month, expiry_year,
                is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $7)
            ON CONFLICT ON CONSTRAINT payment_methods_user_id_key DO UPDATE SET
                card_token = EXCLUDED.card_token,
                card_last_four = EXCLUDED.card_last_four,
                card_type = EXCLUDED.card_type,
                expiry_month = EXCLUDED.expiry_month,
                expiry_year = EXCLUDED.expiry_year,
                is_active = TRUE,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            METHOD_COLUMNS
        ))
        .bind(user_id.as_i64())
        .bind(&card.card_token)
        .bind(&card.card_last_four)
        .bind(&card.card_type)
        .bind(month_column(card.expiry_month)?)
        .bind(year_column(card.expiry_year)?)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save payment method", e))?;

        PaymentMethod::try_from(row)
    }

    async fn update(&self, method: &PaymentMethod) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_methods SET
                card_token = $2,
                card_last_four = $3,
                card_type = $4,
                expiry_month = $5,
                expiry_year = $6,
                is_active = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(method.id.as_i64())
        .bind(&method.card_token)
        .bind(&method.card_last_four)
        .bind(&method.card_type)
        .bind(month_column(method.expiry_month)?)
        .bind(year_column(method.expiry_year)?)
        .bind(method.is_active)
        .bind(method.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update payment method", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentMethodNotFound,
                "Payment method not found",
            ));
        }
        Ok(())
    }
}
