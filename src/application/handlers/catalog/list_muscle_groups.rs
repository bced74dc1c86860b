//! ListMuscleGroupsHandler - all muscle groups in display order.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, MuscleGroup};
use crate::ports::CatalogReader;

pub struct ListMuscleGroupsHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl ListMuscleGroupsHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self) -> Result<Vec<MuscleGroup>, CatalogError> {
        Ok(self.catalog.list_muscle_groups().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalog;

    #[tokio::test]
    async fn returns_groups_in_display_order() {
        let handler = ListMuscleGroupsHandler::new(Arc::new(InMemoryCatalog::sample()));

        let names: Vec<String> = handler.handle().await.unwrap().into_iter().map(|g| g.name).collect();

        assert_eq!(names, vec!["Chest", "Legs"]);
    }
}
