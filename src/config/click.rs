//! Click merchant configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Credentials and endpoints for the Click merchant API.
#[derive(Debug, Clone, Deserialize)]
pub struct ClickConfig {
    #[serde(default)]
    pub merchant_id: String,

    #[serde(default)]
    pub service_id: String,

    /// Shared secret used in callback signatures
    #[serde(default = "empty_secret")]
    pub secret_key: SecretString,

    #[serde(default)]
    pub merchant_user_id: Option<String>,

    /// Where Click sends the user after paying an invoice
    #[serde(default)]
    pub return_url: Option<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Card network requested on invoices
    #[serde(default = "default_card_type")]
    pub card_type: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ClickConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.merchant_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CLICK__MERCHANT_ID"));
        }
        if self.service_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CLICK__SERVICE_ID"));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("CLICK__SECRET_KEY"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("CLICK__API_BASE_URL"));
        }
        if *environment == Environment::Production && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::UrlMustBeHttps("CLICK__API_BASE_URL"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            merchant_id: String::new(),
            service_id: String::new(),
            secret_key: empty_secret(),
            merchant_user_id: None,
            return_url: None,
            api_base_url: default_api_base_url(),
            card_type: default_card_type(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_api_base_url() -> String {
    "https://api.click.uz".to_string()
}

fn default_card_type() -> String {
    "UZCARD".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ClickConfig {
        ClickConfig {
            merchant_id: "11".to_string(),
            service_id: "22".to_string(),
            secret_key: SecretString::new("s3cret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_point_at_click() {
        let config = ClickConfig::default();
        assert_eq!(config.api_base_url, "https://api.click.uz");
        assert_eq!(config.card_type, "UZCARD");
    }

    #[test]
    fn test_requires_credentials() {
        assert_eq!(
            ClickConfig::default().validate(&Environment::Development),
            Err(ValidationError::MissingRequired("CLICK__MERCHANT_ID"))
        );
        let no_secret = ClickConfig {
            secret_key: SecretString::new(String::new()),
            ..valid()
        };
        assert_eq!(
            no_secret.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("CLICK__SECRET_KEY"))
        );
        assert!(valid().validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_partial_section_deserializes_and_fails_validation() {
        let config: ClickConfig =
            serde_json::from_value(serde_json::json!({ "merchant_id": "123" })).unwrap();
        assert_eq!(config.merchant_id, "123");
        assert!(config.service_id.is_empty());
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("CLICK__SERVICE_ID"))
        );
    }

    #[test]
    fn test_plain_http_only_outside_production() {
        let local = ClickConfig {
            api_base_url: "http://localhost:9000".to_string(),
            ..valid()
        };
        assert!(local.validate(&Environment::Development).is_ok());
        assert_eq!(
            local.validate(&Environment::Production),
            Err(ValidationError::UrlMustBeHttps("CLICK__API_BASE_URL"))
        );
    }
}
