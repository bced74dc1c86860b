//! Strongly-typed identifier value objects.
//!
//! Records live in PostgreSQL with `BIGSERIAL` keys, so most identifiers wrap an
//! `i64`. Click echoes the payment id back to us as `merchant_trans_id`, which is
//! one more reason to keep the keys numeric.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

macro_rules! serial_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database key.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw database key.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self).map_err(|_| {
                    ValidationError::invalid_format(stringify!($name), "expected an integer id")
                })
            }
        }
    };
}

serial_id!(
    /// Internal identifier of a user profile.
    UserId
);
serial_id!(
    /// Identifier of a muscle group.
    MuscleGroupId
);
serial_id!(
    /// Identifier of an exercise.
    ExerciseId
);
serial_id!(
    /// Identifier of a workout program.
    ProgramId
);
serial_id!(
    /// Identifier of a program edition.
    EditionId
);
serial_id!(
    /// Identifier of a favorite entry.
    FavoriteId
);
serial_id!(
    /// Identifier of a favorites collection.
    CollectionId
);
serial_id!(
    /// Identifier of a subscription.
    SubscriptionId
);
serial_id!(
    /// Identifier of a payment. Doubles as the Click `merchant_trans_id`.
    PaymentId
);
serial_id!(
    /// Identifier of a saved card.
    PaymentMethodId
);
serial_id!(
    /// Identifier of a workout session.
    WorkoutSessionId
);

/// Telegram user (and private chat) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelegramId(i64);

impl TelegramId {
    /// Creates a TelegramId, rejecting non-positive values.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::invalid_format(
                "telegram_id",
                "must be a positive integer",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TelegramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TelegramId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<i64>().map_err(|_| {
            ValidationError::invalid_format("telegram_id", "expected an integer")
        })?;
        Self::new(value)
    }
}

/// Unique identifier for an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(Uuid);

impl ActivityId {
    /// Creates a new random ActivityId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
