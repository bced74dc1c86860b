//! GetExerciseDetailHandler - the exercise page.

use serde_json::json;
use std::sync::Arc;

use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::catalog::{CatalogError, ExerciseDetail};
use crate::domain::foundation::{ExerciseId, UserId};
use crate::domain::profile::Language;
use crate::ports::{ActivityLog, CatalogReader, FavoriteRepository};

#[derive(Debug, Clone)]
pub struct GetExerciseDetailQuery {
    pub exercise_id: ExerciseId,
    pub user_id: Option<UserId>,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct ExerciseView {
    pub detail: ExerciseDetail,
    /// Instruction text flattened into display lines.
    pub instructions: Vec<String>,
    pub is_favorited: bool,
}

pub struct GetExerciseDetailHandler {
    catalog: Arc<dyn CatalogReader>,
    favorites: Arc<dyn FavoriteRepository>,
    activity: Arc<dyn ActivityLog>,
}

impl GetExerciseDetailHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        favorites: Arc<dyn FavoriteRepository>,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            catalog,
            favorites,
            activity,
        }
    }

    pub async fn handle(&self, query: GetExerciseDetailQuery) -> Result<ExerciseView, CatalogError> {
        let detail = self
            .catalog
            .get_exercise_detail(query.exercise_id)
            .await?
            .ok_or(CatalogError::ExerciseNotFound(query.exercise_id))?;

        let mut is_favorited = false;
        if let Some(user_id) = query.user_id {
            is_favorited = self
                .favorites
                .find(user_id, query.exercise_id)
                .await?
                .is_some();
            record_activity(
                self.activity.as_ref(),
                UserActivity::new(
                    user_id,
                    ActivityKind::ExerciseViewed,
                    json!({ "exercise_id": query.exercise_id }),
                ),
            )
            .await;
        }

        Ok(ExerciseView {
            instructions: detail.instruction_lines(query.language),
            detail,
            is_favorited,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryActivityLog, InMemoryCatalog, InMemoryFavoriteRepository};

    fn handler() -> (GetExerciseDetailHandler, Arc<InMemoryActivityLog>) {
        let catalog = Arc::new(InMemoryCatalog::sample());
        let favorites = Arc::new(InMemoryFavoriteRepository::new(catalog.clone()));
        let activity = Arc::new(InMemoryActivityLog::new());
        (
            GetExerciseDetailHandler::new(catalog, favorites, activity.clone()),
            activity,
        )
    }

    #[tokio::test]
    async fn flattens_instructions_in_step_order_and_logs_view() {
        let (handler, activity) = handler();
        let user = UserId::new(7);

        let view = handler
            .handle(GetExerciseDetailQuery {
                exercise_id: ExerciseId::new(1),
                user_id: Some(user),
                language: Language::English,
            })
            .await
            .unwrap();

        assert_eq!(view.detail.muscle_group.name, "Chest");
        assert_eq!(
            view.instructions,
            vec!["Lie on the bench", "Press the bar up", "Lock out"]
        );
        assert_eq!(activity.kinds_for(user), vec![ActivityKind::ExerciseViewed]);
    }

    #[tokio::test]
    async fn anonymous_view_logs_nothing() {
        let (handler, activity) = handler();

        handler
            .handle(GetExerciseDetailQuery {
                exercise_id: ExerciseId::new(3),
                user_id: None,
                language: Language::Uzbek,
            })
            .await
            .unwrap();

        assert!(activity.records().is_empty());
    }

    #[tokio::test]
    async fn missing_exercise_is_not_found() {
        let (handler, _) = handler();

        let err = handler
            .handle(GetExerciseDetailQuery {
                exercise_id: ExerciseId::new(404),
                user_id: None,
                language: Language::English,
            })
            .await
            .unwrap_err();

        assert_eq!(err, CatalogError::ExerciseNotFound(ExerciseId::new(404)));
    }
}
