//! GetEditionPlanHandler - edition page with exercises grouped by day.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, EditionPlan};
use crate::domain::foundation::EditionId;
use crate::ports::CatalogReader;

#[derive(Debug, Clone)]
pub struct GetEditionPlanQuery {
    pub edition_id: EditionId,
}

pub struct GetEditionPlanHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl GetEditionPlanHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self, query: GetEditionPlanQuery) -> Result<EditionPlan, CatalogError> {
        let edition = self
            .catalog
            .get_edition(query.edition_id)
            .await?
            .ok_or(CatalogError::EditionNotFound(query.edition_id))?;
        let exercises = self.catalog.list_edition_exercises(query.edition_id).await?;
        Ok(EditionPlan::new(edition, exercises))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalog;

    #[tokio::test]
    async fn groups_exercises_by_day() {
        let handler = GetEditionPlanHandler::new(Arc::new(InMemoryCatalog::sample()));

        let plan = handler
            .handle(GetEditionPlanQuery {
                edition_id: EditionId::new(1),
            })
            .await
            .unwrap();

        assert_eq!(plan.total_days(), 2);
        assert_eq!(plan.total_exercises(), 3);
        assert_eq!(plan.days[0].exercises.len(), 2);
        assert!(plan.has_day(2));
        assert!(!plan.has_day(3));
    }

    #[tokio::test]
    async fn unknown_edition_is_not_found() {
        let handler = GetEditionPlanHandler::new(Arc::new(InMemoryCatalog::sample()));

        let err = handler
            .handle(GetEditionPlanQuery {
                edition_id: EditionId::new(99),
            })
            .await
            .unwrap_err();

        assert_eq!(err, CatalogError::EditionNotFound(EditionId::new(99)));
    }
}
