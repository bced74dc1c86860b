//! UpdateProfileHandler - applies the profile edit form.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::profile::{ProfileChanges, ProfileError, UserProfile};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub changes: ProfileChanges,
}

pub struct UpdateProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl UpdateProfileHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<UserProfile, ProfileError> {
        let mut profile = self
            .profiles
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| ProfileError::not_found(cmd.user_id))?;

        let now = Timestamp::now();
        profile.apply_changes(cmd.changes, now.date(), now)?;
        self.profiles.update(&profile).await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::foundation::TelegramId;
    use crate::domain::profile::{NewUserProfile, UnitSystem};
    use rust_decimal::Decimal;

    async fn seeded() -> (Arc<InMemoryProfileRepository>, UserProfile) {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let profile = profiles
            .create(NewUserProfile::new(TelegramId::new(55).unwrap(), None, None))
            .await
            .unwrap();
        (profiles, profile)
    }

    #[tokio::test]
    async fn updates_given_fields_only() {
        let (profiles, profile) = seeded().await;
        let handler = UpdateProfileHandler::new(profiles.clone());

        let updated = handler
            .handle(UpdateProfileCommand {
                user_id: profile.id,
                changes: ProfileChanges {
                    name: Some("  Malika ".into()),
                    unit_system: Some(UnitSystem::English),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Malika");
        assert_eq!(updated.unit_system, UnitSystem::English);
        assert_eq!(updated.weight, None);
    }

    #[tokio::test]
    async fn invalid_weight_leaves_profile_untouched() {
        let (profiles, profile) = seeded().await;
        let handler = UpdateProfileHandler::new(profiles.clone());

        let err = handler
            .handle(UpdateProfileCommand {
                user_id: profile.id,
                changes: ProfileChanges {
                    name: Some("Changed".into()),
                    weight: Some(Decimal::new(-5, 0)),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileError::ValidationFailed { .. }));
        let stored = profiles.find_by_id(profile.id).await.unwrap().unwrap();
        assert_eq!(stored.name, profile.name);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let handler = UpdateProfileHandler::new(Arc::new(InMemoryProfileRepository::new()));

        let err = handler
            .handle(UpdateProfileCommand {
                user_id: UserId::new(999),
                changes: ProfileChanges::default(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, ProfileError::NotFound(UserId::new(999)));
    }
}
