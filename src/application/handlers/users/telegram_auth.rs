//! TelegramAuthHandler - signs a Mini App user in and hands out a session token.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::get_or_create_profile;
use crate::domain::foundation::{AuthenticatedUser, TelegramId, Timestamp};
use crate::domain::profile::{verify_init_data, NewUserProfile, ProfileError, UserProfile};
use crate::ports::{ProfileRepository, SessionIssuer};

/// How init data sent by the Mini App is checked.
#[derive(Clone)]
pub struct InitDataPolicy {
    /// Token of the bot the Mini App is attached to. Without it init data
    /// cannot be verified and only body fields are used.
    pub bot_token: Option<SecretString>,
    /// Oldest accepted `auth_date`, in seconds.
    pub max_age_secs: i64,
    /// Reject requests without verifiable init data.
    pub require_init_data: bool,
}

impl InitDataPolicy {
    pub fn permissive() -> Self {
        Self {
            bot_token: None,
            max_age_secs: 86_400,
            require_init_data: false,
        }
    }
}

/// Sign-in request.
///
/// Either signed `init_data` or the raw Telegram fields must be present.
#[derive(Debug, Clone, Default)]
pub struct TelegramAuthCommand {
    pub init_data: Option<String>,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TelegramAuthResult {
    pub profile: UserProfile,
    pub token: String,
    pub onboarding_completed: bool,
    pub redirect_url: &'static str,
    pub created: bool,
}

pub struct TelegramAuthHandler {
    profiles: Arc<dyn ProfileRepository>,
    sessions: Arc<dyn SessionIssuer>,
    policy: InitDataPolicy,
}

struct Identity {
    telegram_id: TelegramId,
    username: Option<String>,
    first_name: Option<String>,
    is_premium: Option<bool>,
}

impl TelegramAuthHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        sessions: Arc<dyn SessionIssuer>,
        policy: InitDataPolicy,
    ) -> Self {
        Self {
            profiles,
            sessions,
            policy,
        }
    }

    pub async fn handle(&self, cmd: TelegramAuthCommand) -> Result<TelegramAuthResult, ProfileError> {
        // 1. Work out who is signing in
        let identity = self.resolve_identity(&cmd)?;

        // 2. Load or create the profile
        let new_profile = NewUserProfile::new(
            identity.telegram_id,
            identity.username.clone(),
            identity.first_name.clone(),
        )
        .with_premium(identity.is_premium.unwrap_or(false));
        let (mut profile, created) =
            get_or_create_profile(self.profiles.as_ref(), new_profile).await?;

        // 3. Keep Telegram-side fields fresh for returning users
        if !created
            && profile.refresh_telegram_identity(identity.username, identity.is_premium, Timestamp::now())
        {
            self.profiles.update(&profile).await?;
        }

        // 4. Issue the session token
        let token = self
            .sessions
            .issue(&AuthenticatedUser::new(profile.id, profile.telegram_id))
            .await?;

        tracing::info!(user_id = %profile.id, created, "telegram sign-in");

        Ok(TelegramAuthResult {
            onboarding_completed: profile.onboarding_completed,
            redirect_url: profile.landing_path(),
            profile,
            token,
            created,
        })
    }

    fn resolve_identity(&self, cmd: &TelegramAuthCommand) -> Result<Identity, ProfileError> {
        let init_data = cmd.init_data.as_deref().filter(|d| !d.trim().is_empty());

        match (init_data, self.policy.bot_token.as_ref()) {
            (Some(data), Some(token)) => {
                let user = verify_init_data(
                    data,
                    token.expose_secret(),
                    Timestamp::now(),
                    self.policy.max_age_secs,
                )?;
                Ok(Identity {
                    telegram_id: user.telegram_id()?,
                    username: user.username,
                    first_name: user.first_name,
                    is_premium: user.is_premium,
                })
            }
            _ if self.policy.require_init_data => Err(ProfileError::Unauthorized(
                "Signed Telegram init data is required".to_string(),
            )),
            _ => {
                let raw_id = cmd
                    .telegram_id
                    .ok_or_else(|| ProfileError::validation("telegram_id", "telegram_id is required"))?;
                Ok(Identity {
                    telegram_id: TelegramId::new(raw_id)?,
                    username: cmd.username.clone(),
                    first_name: cmd.first_name.clone(),
                    is_premium: None,
                })
            }
        }
    }
}
