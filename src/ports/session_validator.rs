//! Session token ports.
//!
//! After a user signs in through the Mini App the API hands out a bearer
//! token. `SessionIssuer` mints it, `SessionValidator` turns it back into an
//! [`AuthenticatedUser`] on every request.
//!
//! # Contract
//!
//! Validators must:
//! - Verify the token signature
//! - Return `AuthError::TokenExpired` for expired tokens
//! - Return `AuthError::InvalidToken` for anything else that does not verify

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError>;
}

#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{TelegramId, UserId};
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct TestSessions {
        tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    }

    #[async_trait]
    impl SessionIssuer for TestSessions {
        async fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
            let token = format!("token-{}", user.id);
            self.tokens.write().unwrap().insert(token.clone(), user.clone());
            Ok(token)
        }
    }

    #[async_trait]
    impl SessionValidator for TestSessions {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn issued_token_validates_back_to_user() {
        let sessions = TestSessions {
            tokens: RwLock::new(HashMap::new()),
        };
        let user = AuthenticatedUser::new(UserId::new(7), TelegramId::new(4242).unwrap());

        let token = sessions.issue(&user).await.unwrap();

        assert_eq!(sessions.validate(&token).await.unwrap(), user);
        assert!(matches!(
            sessions.validate("nope").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn ports_are_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SessionIssuer>();
        assert_send_sync::<dyn SessionValidator>();
    }
}
