//! MoveFavoriteHandler - puts a favorite into a collection or takes it out.

use std::sync::Arc;

use super::owned_collection;
use crate::domain::favorites::{Favorite, FavoriteError};
use crate::domain::foundation::{CollectionId, FavoriteId, UserId};
use crate::ports::FavoriteRepository;

#[derive(Debug, Clone)]
pub struct MoveFavoriteCommand {
    pub user_id: UserId,
    pub favorite_id: FavoriteId,
    /// `None` removes the favorite from its collection.
    pub collection_id: Option<CollectionId>,
}

pub struct MoveFavoriteHandler {
    favorites: Arc<dyn FavoriteRepository>,
}

impl MoveFavoriteHandler {
    pub fn new(favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorites }
    }

    pub async fn handle(&self, cmd: MoveFavoriteCommand) -> Result<Favorite, FavoriteError> {
        // 1. Both sides must belong to the caller
        let mut favorite = self
            .favorites
            .find_by_id(cmd.favorite_id)
            .await?
            .filter(|f| f.is_owned_by(cmd.user_id))
            .ok_or(FavoriteError::FavoriteNotFound(cmd.favorite_id))?;
        if let Some(collection_id) = cmd.collection_id {
            owned_collection(self.favorites.as_ref(), cmd.user_id, collection_id).await?;
        }

        // 2. Relink
        self.favorites
            .set_collection(favorite.id, cmd.collection_id)
            .await?;
        favorite.collection_id = cmd.collection_id;
        Ok(favorite)
    }
}
