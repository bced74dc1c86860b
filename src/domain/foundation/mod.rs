//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and error types
//! that form the vocabulary of the fitness domain.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ActivityId, CollectionId, EditionId, ExerciseId, FavoriteId, MuscleGroupId, PaymentId,
    PaymentMethodId, ProgramId, SubscriptionId, TelegramId, UserId, WorkoutSessionId,
};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
