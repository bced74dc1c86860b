//! Append-only user activity log.

use async_trait::async_trait;

use crate::domain::activity::UserActivity;
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, activity: UserActivity) -> Result<(), DomainError>;
}
