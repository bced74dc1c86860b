//! ToggleFavoriteHandler - adds an exercise to favorites or removes it.

use serde_json::json;
use std::sync::Arc;

use super::owned_collection;
use crate::application::handlers::record_activity;
use crate::domain::activity::{ActivityKind, UserActivity};
use crate::domain::favorites::{FavoriteError, NewFavorite, ToggleOutcome};
use crate::domain::foundation::{CollectionId, ErrorCode, ExerciseId, UserId};
use crate::ports::{ActivityLog, CatalogReader, FavoriteRepository};

#[derive(Debug, Clone)]
pub struct ToggleFavoriteCommand {
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    /// Collection for a newly added favorite. Ignored on removal.
    pub collection_id: Option<CollectionId>,
    pub notes: Option<String>,
}

/// Handler for the favorite star.
///
/// The `(user, exercise)` pair is unique, so toggling twice always returns to
/// the starting state.
pub struct ToggleFavoriteHandler {
    catalog: Arc<dyn CatalogReader>,
    favorites: Arc<dyn FavoriteRepository>,
    activity: Arc<dyn ActivityLog>,
}

impl ToggleFavoriteHandler {
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

    pub async fn handle(&self, cmd: ToggleFavoriteCommand) -> Result<ToggleOutcome, FavoriteError> {
        // 1. The exercise must exist
        let exercise = self
            .catalog
            .get_exercise(cmd.exercise_id)
            .await?
            .ok_or(FavoriteError::ExerciseNotFound(cmd.exercise_id))?;

        // 2. Already a favorite: remove it
        if let Some(existing) = self.favorites.find(cmd.user_id, cmd.exercise_id).await? {
            self.favorites.delete(existing.id).await?;
            tracing::debug!(user_id = %cmd.user_id, exercise_id = %cmd.exercise_id, "favorite removed");
            return Ok(ToggleOutcome::Removed(existing.id));
        }

        // 3. Otherwise add it, into a collection the user owns
        if let Some(collection_id) = cmd.collection_id {
            owned_collection(self.favorites.as_ref(), cmd.user_id, collection_id).await?;
        }
        let new_favorite = NewFavorite::new(cmd.user_id, cmd.exercise_id)
            .in_collection(cmd.collection_id)
            .with_notes(cmd.notes)?;
        let favorite = match self.favorites.create(new_favorite).await {
            Ok(created) => created,
            // A parallel toggle won the insert; report the stored row.
            Err(err) if err.code == ErrorCode::FavoriteExists => self
                .favorites
                .find(cmd.user_id, cmd.exercise_id)
                .await?
                .ok_or_else(|| FavoriteError::infrastructure("favorite vanished after conflict"))?,
            Err(err) => return Err(err.into()),
        };

        record_activity(
            self.activity.as_ref(),
            UserActivity::new(
                cmd.user_id,
                ActivityKind::ExerciseFavourited,
                json!({ "exercise_id": exercise.id, "exercise_name": exercise.name }),
            ),
        )
        .await;

        Ok(ToggleOutcome::Added(favorite))
    }
}
