//! Telegram bot and Mini App configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Without it notices are only logged.
    #[serde(default)]
    pub bot_token: Option<SecretString>,

    /// Public base URL of the Mini App, used for buttons and the webhook
    pub webapp_url: String,

    /// Telegram id allowed to open the admin link
    #[serde(default)]
    pub admin_id: Option<i64>,

    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,

    /// Reject sign-ins that do not carry signed init data
    #[serde(default)]
    pub require_init_data: bool,

    /// Maximum age of init data in seconds
    #[serde(default = "default_init_data_max_age")]
    pub init_data_max_age_secs: i64,
}

impl TelegramConfig {
    /// Mini App URL without a trailing slash.
    pub fn webapp_base(&self) -> &str {
        self.webapp_url.trim_end_matches('/')
    }

    pub fn webhook_url(&self) -> String {
        format!("{}/bot/webhook", self.webapp_base())
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.webapp_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__WEBAPP_URL"));
        }
        if url::Url::parse(&self.webapp_url).is_err() {
            return Err(ValidationError::InvalidUrl("TELEGRAM__WEBAPP_URL"));
        }
        if *environment == Environment::Production {
            if !self.webapp_url.starts_with("https://") {
                return Err(ValidationError::UrlMustBeHttps("TELEGRAM__WEBAPP_URL"));
            }
            if self.bot_token.is_none() {
                return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
            }
        }
        if self.require_init_data && self.bot_token.is_none() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            webapp_url: "http://localhost:8000".to_string(),
            admin_id: None,
            webhook_secret: None,
            require_init_data: false,
            init_data_max_age_secs: default_init_data_max_age(),
        }
    }
}

fn default_init_data_max_age() -> i64 {
    24 * 60 * 60
}
