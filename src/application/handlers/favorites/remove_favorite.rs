//! RemoveFavoriteHandler - deletes one favorite by id.

use std::sync::Arc;

use crate::domain::favorites::FavoriteError;
use crate::domain::foundation::{FavoriteId, UserId};
use crate::ports::FavoriteRepository;

#[derive(Debug, Clone)]
pub struct RemoveFavoriteCommand {
    pub user_id: UserId,
    pub favorite_id: FavoriteId,
}

pub struct RemoveFavoriteHandler {
    favorites: Arc<dyn FavoriteRepository>,
}

impl RemoveFavoriteHandler {
    pub fn new(favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorites }
    }

    /// Someone else's favorite is reported as missing.
    pub async fn handle(&self, cmd: RemoveFavoriteCommand) -> Result<(), FavoriteError> {
        let favorite = self
            .favorites
            .find_by_id(cmd.favorite_id)
            .await?
            .filter(|f| f.is_owned_by(cmd.user_id))
            .ok_or(FavoriteError::FavoriteNotFound(cmd.favorite_id))?;

        if !self.favorites.delete(favorite.id).await? {
            return Err(FavoriteError::FavoriteNotFound(cmd.favorite_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCatalog, InMemoryFavoriteRepository};
    use crate::domain::favorites::NewFavorite;
    use crate::domain::foundation::ExerciseId;

    #[tokio::test]
    async fn removes_own_favorite_and_hides_foreign_ones() {
        let favorites = Arc::new(InMemoryFavoriteRepository::new(Arc::new(InMemoryCatalog::sample())));
        let mine = favorites
            .create(NewFavorite::new(UserId::new(1), ExerciseId::new(1)))
            .await
            .unwrap();
        let theirs = favorites
            .create(NewFavorite::new(UserId::new(2), ExerciseId::new(1)))
            .await
            .unwrap();
        let handler = RemoveFavoriteHandler::new(favorites.clone());

        handler
            .handle(RemoveFavoriteCommand {
                user_id: UserId::new(1),
                favorite_id: mine.id,
            })
            .await
            .unwrap();
        let err = handler
            .handle(RemoveFavoriteCommand {
                user_id: UserId::new(1),
                favorite_id: theirs.id,
            })
            .await
            .unwrap_err();

        assert_eq!(err, FavoriteError::FavoriteNotFound(theirs.id));
        assert!(favorites.find_by_id(mine.id).await.unwrap().is_none());
        assert!(favorites.find_by_id(theirs.id).await.unwrap().is_some());
    }
}
