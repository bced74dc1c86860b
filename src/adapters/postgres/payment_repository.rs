//! PostgreSQL implementation of PaymentRepository.
//!
//! Completion races are settled in the database: `settle_if_pending` and
//! `attach_click_transaction` only touch rows still in `pending`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{is_unique_violation, parse_column, timestamp};
use crate::domain::billing::{NewPayment, Payment};
use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentId, SubscriptionId, Timestamp, UserId,
};
use crate::ports::PaymentRepository;

const SELECT_PAYMENT: &str = r#"
    SELECT id, user_id, subscription_id, amount, status, click_trans_id, transaction_id,
           is_auto_payment, auto_payment_attempt, metadata, created_at, updated_at, completed_at
    FROM payments
"#;

const TRANSACTION_ID_KEY: &str = "payments_transaction_id_key";

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    user_id: i64,
    subscription_id: Option<i64>,
    amount: Decimal,
    status: String,
    click_trans_id: Option<String>,
    transaction_id: Option<String>,
    is_auto_payment: bool,
    auto_payment_attempt: i32,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::new(row.id),
            user_id: UserId::new(row.user_id),
            subscription_id: row.subscription_id.map(SubscriptionId::new),
            amount: row.amount,
            status: parse_column("status", &row.status)?,
            click_trans_id: row.click_trans_id,
            transaction_id: row.transaction_id,
            is_auto_payment: row.is_auto_payment,
            auto_payment_attempt: row.auto_payment_attempt,
            metadata: row.metadata,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
            completed_at: row.completed_at.map(timestamp),
        })
    }
}

fn write_error(context: &str, err: sqlx::Error) -> DomainError {
    if is_unique_violation(&err, TRANSACTION_ID_KEY) {
        return DomainError::new(
            ErrorCode::DuplicateTransaction,
            "Transaction id already recorded",
        );
    }
    DomainError::database(context, err)
}

impl PostgresPaymentRepository {
    /// Writes every mutable column, optionally guarded on the stored status.
    async fn write(&self, payment: &Payment, only_if_pending: bool) -> Result<u64, DomainError> {
        let sql = format!(
            r#"
            UPDATE payments SET
                subscription_id = $2,
                status = $3,
                click_trans_id = $4,
                transaction_id = $5,
                metadata = $6,
                updated_at = $7,
                completed_at = $8
            WHERE id = $1{}
            "#,
            if only_if_pending { " AND status = 'pending'" } else { "" }
        );

        let result = sqlx::query(&sql)
            .bind(payment.id.as_i64())
            .bind(payment.subscription_id.map(|s| s.as_i64()))
            .bind(payment.status.as_str())
            .bind(&payment.click_trans_id)
            .bind(&payment.transaction_id)
            .bind(&payment.metadata)
            .bind(payment.updated_at.as_datetime())
            .bind(payment.completed_at.map(|t| *t.as_datetime()))
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("Failed to update payment", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    #[tracing::instrument(skip(self, payment), fields(user_id = %payment.user_id, auto = payment.is_auto_payment))]
    async fn create(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO payments (
                user_id, subscription_id, amount, status, is_auto_payment,
                auto_payment_attempt, metadata, created_at, updated_at
            ) VALUES ($1, $2, $3, 'pending', $4, $5, '{}'::jsonb, $6, $6)
            RETURNING id
            "#,
        )
        .bind(payment.user_id.as_i64())
        .bind(payment.subscription_id.map(|s| s.as_i64()))
        .bind(payment.amount)
        .bind(payment.is_auto_payment)
        .bind(payment.auto_payment_attempt)
        .bind(payment.created_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to create payment", e))?;

        Ok(payment.into_payment(PaymentId::new(id)))
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PAYMENT))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    #[tracing::instrument(skip(self, payment), fields(payment_id = %payment.id, status = %payment.status))]
    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        if self.write(payment, false).await? == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment {} not found", payment.id),
            ));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, payment), fields(payment_id = %payment.id, status = %payment.status))]
    async fn settle_if_pending(&self, payment: &Payment) -> Result<bool, DomainError> {
        Ok(self.write(payment, true).await? > 0)
    }

    async fn attach_click_transaction(
        &self,
        id: PaymentId,
        click_trans_id: &str,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET click_trans_id = $2, updated_at = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_i64())
        .bind(click_trans_id)
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to store click transaction", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            SELECT_PAYMENT
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
