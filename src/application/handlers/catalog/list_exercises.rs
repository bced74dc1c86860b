//! ListExercisesHandler - exercise list, optionally filtered by muscle group.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Exercise};
use crate::domain::foundation::{ExerciseId, UserId};
use crate::ports::{CatalogReader, FavoriteRepository};

#[derive(Debug, Clone, Default)]
pub struct ListExercisesQuery {
    /// Muscle group name as it appears in the URL. Matched case-insensitively.
    pub muscle: Option<String>,
    /// Signed-in user, used to flag favorites.
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseListItem {
    pub exercise: Exercise,
    pub is_favorited: bool,
}

pub struct ListExercisesHandler {
    catalog: Arc<dyn CatalogReader>,
    favorites: Arc<dyn FavoriteRepository>,
}

impl ListExercisesHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>, favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { catalog, favorites }
    }

    pub async fn handle(&self, query: ListExercisesQuery) -> Result<Vec<ExerciseListItem>, CatalogError> {
        // 1. Resolve the muscle group filter
        let group_id = match query.muscle.as_deref() {
            Some(name) => Some(
                self.catalog
                    .find_muscle_group_by_name(name)
                    .await?
                    .ok_or_else(|| CatalogError::MuscleGroupNotFound(name.trim().to_string()))?
                    .id,
            ),
            None => None,
        };

        // 2. Load exercises
        let exercises = self.catalog.list_exercises(group_id).await?;

        // 3. Flag the caller's favorites
        let favorited: HashSet<ExerciseId> = match query.user_id {
            Some(user_id) => self
                .favorites
                .favorited_exercise_ids(user_id)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        Ok(exercises
            .into_iter()
            .map(|exercise| ExerciseListItem {
                is_favorited: favorited.contains(&exercise.id),
                exercise,
            })
            .collect())
    }
}
