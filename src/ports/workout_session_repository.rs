//! WorkoutSessionRepository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId, WorkoutSessionId};
use crate::domain::workout::{NewWorkoutSession, WorkoutSession};

#[async_trait]
pub trait WorkoutSessionRepository: Send + Sync {
    async fn create(&self, session: NewWorkoutSession) -> Result<WorkoutSession, DomainError>;

    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: WorkoutSessionId) -> Result<Option<WorkoutSession>, DomainError>;

    /// All sessions of a user, newest first.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<WorkoutSession>, DomainError>;
}
