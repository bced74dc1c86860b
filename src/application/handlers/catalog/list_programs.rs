//! ListProgramsHandler - active programs with edition counts.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, ProgramSummary};
use crate::ports::CatalogReader;

pub struct ListProgramsHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl ListProgramsHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self) -> Result<Vec<ProgramSummary>, CatalogError> {
        Ok(self.catalog.list_active_programs().await?)
    }
}
