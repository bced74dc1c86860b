//! GetProfileHandler - query handler for the signed-in user's profile.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::profile::{ProfileError, UserProfile};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub user_id: UserId,
}

pub struct GetProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl GetProfileHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<UserProfile, ProfileError> {
        self.profiles
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| ProfileError::not_found(query.user_id))
    }
}
