//! ChangeLanguageHandler - switches the interface language.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::profile::{Language, ProfileError, UserProfile};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct ChangeLanguageCommand {
    pub user_id: UserId,
    /// Raw language code (`uz`, `en` or `ru`).
    pub language: String,
}

pub struct ChangeLanguageHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl ChangeLanguageHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, cmd: ChangeLanguageCommand) -> Result<UserProfile, ProfileError> {
        let language: Language = cmd.language.parse()?;

        let mut profile = self
            .profiles
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| ProfileError::not_found(cmd.user_id))?;

        profile.set_language(language, Timestamp::now());
        self.profiles.update(&profile).await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::foundation::TelegramId;
    use crate::domain::profile::NewUserProfile;

    #[tokio::test]
    async fn switches_language_and_rejects_unknown_codes() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let profile = profiles
            .create(NewUserProfile::new(TelegramId::new(88).unwrap(), None, None))
            .await
            .unwrap();
        let handler = ChangeLanguageHandler::new(profiles.clone());

        let updated = handler
            .handle(ChangeLanguageCommand {
                user_id: profile.id,
                language: "RU".into(),
            })
            .await
            .unwrap();
        assert_eq!(updated.language, Language::Russian);

        let err = handler
            .handle(ChangeLanguageCommand {
                user_id: profile.id,
                language: "de".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::ValidationFailed { .. }));
    }
}
