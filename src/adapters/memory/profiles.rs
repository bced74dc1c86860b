//! In-memory profile repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{lock, Sequence};
use crate::domain::foundation::{DomainError, ErrorCode, TelegramId, Timestamp, UserId};
use crate::domain::profile::{NewUserProfile, UserProfile};
use crate::ports::ProfileRepository;

#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    ids: Sequence,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored profiles.
    pub fn all(&self) -> Vec<UserProfile> {
        match self.profiles.lock() {
            Ok(guard) => guard.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn create(&self, profile: NewUserProfile) -> Result<UserProfile, DomainError> {
        let mut profiles = lock(&self.profiles)?;
        if profiles.values().any(|p| p.telegram_id == profile.telegram_id) {
            return Err(DomainError::new(
                ErrorCode::UserExists,
                format!("Profile for telegram id {} already exists", profile.telegram_id),
            ));
        }
        let id = UserId::new(self.ids.next()?);
        let created = profile.into_profile(id, Timestamp::now());
        profiles.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let mut profiles = lock(&self.profiles)?;
        match profiles.get_mut(&profile.id) {
            Some(stored) => {
                *stored = profile.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("Profile {} not found", profile.id),
            )),
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(lock(&self.profiles)?.get(&id).cloned())
    }

    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<UserProfile>, DomainError> {
        Ok(lock(&self.profiles)?
            .values()
            .find(|p| p.telegram_id == telegram_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn telegram_id_is_unique() {
        let repo = InMemoryProfileRepository::new();
        let tid = TelegramId::new(100).unwrap();
        let first = repo.create(NewUserProfile::new(tid, None, None)).await.unwrap();
        assert_eq!(first.id, UserId::new(1));

        let err = repo.create(NewUserProfile::new(tid, None, None)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserExists);
        assert_eq!(repo.find_by_telegram_id(tid).await.unwrap(), Some(first));
    }
}
