//! Telegram Mini App init data verification.
//!
//! Telegram signs the `initData` query string handed to a Web App:
//!
//! ```text
//! secret = HMAC_SHA256(key = "WebAppData", msg = bot_token)
//! hash   = hex(HMAC_SHA256(key = secret, msg = data_check_string))
//! ```
//!
//! where `data_check_string` is every `key=value` pair except `hash`, sorted by
//! key and joined with `\n`.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{AuthError, TelegramId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// User block embedded in verified init data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl WebAppUser {
    pub fn telegram_id(&self) -> Result<TelegramId, AuthError> {
        TelegramId::new(self.id).map_err(|e| AuthError::InvalidInitData(e.to_string()))
    }
}

/// Verifies init data signed for `bot_token` and returns its user.
///
/// `max_age_secs` bounds how old `auth_date` may be relative to `now`.
pub fn verify_init_data(
    init_data: &str,
    bot_token: &str,
    now: Timestamp,
    max_age_secs: i64,
) -> Result<WebAppUser, AuthError> {
    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(init_data.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let hash_pos = pairs
        .iter()
        .position(|(k, _)| k == "hash")
        .ok_or_else(|| AuthError::InvalidInitData("missing hash".into()))?;
    let (_, received_hash) = pairs.remove(hash_pos);

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let data_check_string = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n");

    let expected = sign_data_check_string(&data_check_string, bot_token)?;
    let received = hex::decode(received_hash.trim())
        .map_err(|_| AuthError::InvalidInitData("hash is not hex".into()))?;
    if !bool::from(expected.ct_eq(&received)) {
        tracing::warn!("Telegram init data signature mismatch");
        return Err(AuthError::InvalidInitData("signature mismatch".into()));
    }

    let auth_date = pairs
        .iter()
        .find(|(k, _)| k == "auth_date")
        .and_then(|(_, v)| v.parse::<i64>().ok())
        .ok_or_else(|| AuthError::InvalidInitData("missing auth_date".into()))?;
    if now.as_unix_secs() - auth_date > max_age_secs {
        return Err(AuthError::InvalidInitData("init data expired".into()));
    }

    let user_json = pairs
        .iter()
        .find(|(k, _)| k == "user")
        .map(|(_, v)| v.as_str())
        .ok_or_else(|| AuthError::InvalidInitData("missing user".into()))?;
    serde_json::from_str(user_json)
        .map_err(|e| AuthError::InvalidInitData(format!("malformed user: {}", e)))
}

fn sign_data_check_string(data_check_string: &str, bot_token: &str) -> Result<Vec<u8>, AuthError> {
    let mut secret = HmacSha256::new_from_slice(b"WebAppData")
        .map_err(|e| AuthError::InvalidInitData(e.to_string()))?;
    secret.update(bot_token.as_bytes());
    let secret_key = secret.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(&secret_key)
        .map_err(|e| AuthError::InvalidInitData(e.to_string()))?;
    mac.update(data_check_string.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Builds a signed init data string. Used by tests and local tooling.
pub fn sign_init_data(fields: &[(&str, &str)], bot_token: &str) -> Result<String, AuthError> {
    let mut sorted: Vec<(&str, &str)> = fields.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let data_check_string = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n");
    let hash = hex::encode(sign_data_check_string(&data_check_string, bot_token)?);

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in fields {
        serializer.append_pair(k, v);
    }
    serializer.append_pair("hash", &hash);
    Ok(serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "123456:TEST-TOKEN";
    const USER: &str = r#"{"id":4242,"first_name":"Dilnoza","username":"dil","is_premium":true}"#;

    fn signed(auth_date: i64) -> String {
        sign_init_data(
            &[("auth_date", &auth_date.to_string()), ("query_id", "AAE"), ("user", USER)],
            TOKEN,
        )
        .unwrap()
    }

    #[test]
    fn accepts_correctly_signed_data() {
        let now = Timestamp::now();
        let user = verify_init_data(&signed(now.as_unix_secs()), TOKEN, now, 3600).unwrap();
        assert_eq!(user.id, 4242);
        assert_eq!(user.username.as_deref(), Some("dil"));
        assert_eq!(user.is_premium, Some(true));
    }

    #[test]
    fn rejects_data_signed_with_another_token() {
        let now = Timestamp::now();
        let result = verify_init_data(&signed(now.as_unix_secs()), "999:OTHER", now, 3600);
        assert!(matches!(result, Err(AuthError::InvalidInitData(_))));
    }

    #[test]
    fn rejects_tampered_fields() {
        let now = Timestamp::now();
        let tampered = signed(now.as_unix_secs()).replace("AAE", "AAF");
        assert!(verify_init_data(&tampered, TOKEN, now, 3600).is_err());
    }

    #[test]
    fn rejects_stale_auth_date() {
        let now = Timestamp::now();
        let stale = signed(now.as_unix_secs() - 7200);
        assert!(verify_init_data(&stale, TOKEN, now, 3600).is_err());
    }

    #[test]
    fn rejects_missing_hash() {
        assert!(verify_init_data("auth_date=1&user=%7B%7D", TOKEN, Timestamp::now(), 60).is_err());
    }
}
