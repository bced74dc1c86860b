//! In-memory workout session repository.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::Mutex;

use super::{lock, Sequence};
use crate::domain::foundation::{DomainError, ErrorCode, UserId, WorkoutSessionId};
use crate::domain::workout::{NewWorkoutSession, WorkoutSession};
use crate::ports::WorkoutSessionRepository;

#[derive(Default)]
pub struct InMemoryWorkoutSessionRepository {
    sessions: Mutex<Vec<WorkoutSession>>,
    ids: Sequence,
}

impl InMemoryWorkoutSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a session as-is, for seeding history in tests.
    pub fn insert(&self, session: WorkoutSession) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.push(session);
        }
    }
}

#[async_trait]
impl WorkoutSessionRepository for InMemoryWorkoutSessionRepository {
    async fn create(&self, session: NewWorkoutSession) -> Result<WorkoutSession, DomainError> {
        let mut sessions = lock(&self.sessions)?;
        let mut id = self.ids.next()?;
        while sessions.iter().any(|s| s.id.as_i64() == id) {
            id = self.ids.next()?;
        }
        let created = session.into_session(WorkoutSessionId::new(id));
        sessions.push(created.clone());
        Ok(created)
    }

    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        let mut sessions = lock(&self.sessions)?;
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::WorkoutSessionNotFound,
                "Workout session not found",
            )),
        }
    }

    async fn find_by_id(&self, id: WorkoutSessionId) -> Result<Option<WorkoutSession>, DomainError> {
        Ok(lock(&self.sessions)?.iter().find(|s| s.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<WorkoutSession>, DomainError> {
        let mut owned: Vec<WorkoutSession> = lock(&self.sessions)?
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|s| Reverse((s.started_at, s.id)));
        Ok(owned)
    }
}
