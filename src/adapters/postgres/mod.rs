//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresProfileRepository` / `PostgresActivityLog` - users and their event log
//! - `PostgresCatalogReader` - read-only catalog queries
//! - `PostgresFavoriteRepository` - favorites and collections
//! - `PostgresWorkoutSessionRepository` - training sessions
//! - `PostgresSubscriptionRepository`, `PostgresPaymentRepository`,
//!   `PostgresPaymentMethodRepository` - billing records

mod activity_log;
mod catalog_reader;
mod favorite_repository;
mod payment_method_repository;
mod payment_repository;
mod pool;
mod profile_repository;
mod subscription_repository;
mod workout_session_repository;

pub use activity_log::PostgresActivityLog;
pub use catalog_reader::PostgresCatalogReader;
pub use favorite_repository::PostgresFavoriteRepository;
pub use payment_method_repository::PostgresPaymentMethodRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use pool::{connect_pool, run_migrations};
pub use profile_repository::PostgresProfileRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use workout_session_repository::PostgresWorkoutSessionRepository;

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// True when `err` is a unique violation on the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(constraint),
        _ => false,
    }
}

/// Parses a text column into a domain enum, reporting bad data as a database error.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}': {}", column, value, e),
        )
    })
}

pub(crate) fn timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(dt)
}
