//! HS256 session tokens.
//!
//! Implements both `SessionIssuer` and `SessionValidator`. Tokens are minted
//! after Telegram sign-in and carry the profile id as `sub` and the Telegram
//! id as `tg`. Validation checks:
//! - **Signature** against the shared session secret
//! - **Issuer (iss)** must match the configured issuer
//! - **Expiry (exp)** must be in the future

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, TelegramId, Timestamp, UserId};
use crate::ports::{SessionIssuer, SessionValidator};

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Profile id
    sub: String,
    /// Telegram user id
    tg: i64,
    iss: String,
    iat: i64,
    exp: i64,
}

pub struct JwtSessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtSessionManager {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.session_secret.expose_secret().as_bytes(),
            config.issuer.clone(),
            config.session_ttl(),
        )
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;
        validation
    }
}

#[async_trait]
impl SessionIssuer for JwtSessionManager {
    async fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let now = Timestamp::now().as_unix_secs();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AuthError::IssueFailed("session ttl out of range".to_string()))?;
        let claims = SessionClaims {
            sub: user.id.as_i64().to_string(),
            tg: user.telegram_id.as_i64(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::IssueFailed(e.to_string()))
    }
}

#[async_trait]
impl SessionValidator for JwtSessionManager {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Session token expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::debug!(error = %e, "Session token rejected");
                        AuthError::InvalidToken
                    }
                }
            })?;
        let claims = data.claims;

        let id: i64 = claims.sub.parse().map_err(|_| {
            tracing::warn!(sub = %claims.sub, "Session token has a non-numeric subject");
            AuthError::InvalidToken
        })?;
        let telegram_id = TelegramId::new(claims.tg).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(UserId::new(id), telegram_id))
    }
}
