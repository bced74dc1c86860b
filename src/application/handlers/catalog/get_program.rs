//! GetProgramHandler - program page with its editions.

use serde_json::json;
use std::sync::Arc;

use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::catalog::{CatalogError, ProgramDetail};
use crate::domain::foundation::{ProgramId, UserId};
use crate::ports::{ActivityLog, CatalogReader};

#[derive(Debug, Clone)]
pub struct GetProgramQuery {
    pub program_id: ProgramId,
    pub user_id: Option<UserId>,
}

pub struct GetProgramHandler {
    catalog: Arc<dyn CatalogReader>,
    activity: Arc<dyn ActivityLog>,
}

impl GetProgramHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>, activity: Arc<dyn ActivityLog>) -> Self {
        Self { catalog, activity }
    }

    /// Inactive programs are treated as missing.
    pub async fn handle(&self, query: GetProgramQuery) -> Result<ProgramDetail, CatalogError> {
        let detail = self
            .catalog
            .get_program_detail(query.program_id)
            .await?
            .filter(|d| d.program.is_active)
            .ok_or(CatalogError::ProgramNotFound(query.program_id))?;

        if let Some(user_id) = query.user_id {
            record_activity(
                self.activity.as_ref(),
                UserActivity::new(
                    user_id,
                    ActivityKind::ProgramViewed,
                    json!({ "program_id": query.program_id, "title": detail.program.title }),
                ),
            )
            .await;
        }

        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryActivityLog, InMemoryCatalog};

    fn handler() -> (GetProgramHandler, Arc<InMemoryActivityLog>) {
        let activity = Arc::new(InMemoryActivityLog::new());
        (
            GetProgramHandler::new(Arc::new(InMemoryCatalog::sample()), activity.clone()),
            activity,
        )
    }

    #[tokio::test]
    async fn returns_ordered_editions_and_logs_view() {
        let (handler, activity) = handler();
        let user = UserId::new(3);

        let detail = handler
            .handle(GetProgramQuery {
                program_id: ProgramId::new(1),
                user_id: Some(user),
            })
            .await
            .unwrap();

        let order: Vec<i64> = detail.editions.iter().map(|e| e.id.as_i64()).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(activity.kinds_for(user), vec![ActivityKind::ProgramViewed]);
    }

    #[tokio::test]
    async fn inactive_program_is_not_found() {
        let (handler, _) = handler();

        let err = handler
            .handle(GetProgramQuery {
                program_id: ProgramId::new(2),
                user_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err, CatalogError::ProgramNotFound(ProgramId::new(2)));
    }
}
