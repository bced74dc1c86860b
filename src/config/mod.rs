//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file when
//! present) using the `config` and `dotenvy` crates. Variables carry the
//! `FITNESS_HUB` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use fitness_hub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod click;
mod database;
mod error;
mod server;
mod subscription;
mod telegram;

pub use auth::AuthConfig;
pub use click::ClickConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use subscription::SubscriptionConfig;
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Optional PostgreSQL settings; in-memory storage without a URL
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Click merchant credentials
    #[serde(default)]
    pub click: ClickConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `FITNESS_HUB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FITNESS_HUB__CLICK__SECRET_KEY=...` -> `click.secret_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when values cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FITNESS_HUB")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Click credentials are only mandatory in production or once a merchant
    /// id has been configured.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = &self.server.environment;
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(environment)?;
        if self.is_production() || !self.click.merchant_id.is_empty() {
            self.click.validate(environment)?;
        }
        self.telegram.validate(environment)?;
        self.subscription.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
