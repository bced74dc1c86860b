//! Favorite handlers - toggling favorites and organising them into collections.

mod collections;
mod list_favorites;
mod move_favorite;
mod remove_favorite;
mod toggle_favorite;

pub use collections::{
    CreateCollectionCommand, CreateCollectionHandler, DeleteCollectionCommand,
    DeleteCollectionHandler, ListCollectionsHandler, ListCollectionsQuery,
};
pub use list_favorites::{ListFavoritesHandler, ListFavoritesQuery};
pub use move_favorite::{MoveFavoriteCommand, MoveFavoriteHandler};
pub use remove_favorite::{RemoveFavoriteCommand, RemoveFavoriteHandler};
pub use toggle_favorite::{ToggleFavoriteCommand, ToggleFavoriteHandler};

use crate::domain::favorites::{FavoriteCollection, FavoriteError};
use crate::domain::foundation::{CollectionId, UserId};
use crate::ports::FavoriteRepository;

/// Loads a collection, hiding collections owned by other users.
pub(crate) async fn owned_collection(
    favorites: &dyn FavoriteRepository,
    user_id: UserId,
    collection_id: CollectionId,
) -> Result<FavoriteCollection, FavoriteError> {
    favorites
        .find_collection(collection_id)
        .await?
        .filter(|c| c.is_owned_by(user_id))
        .ok_or(FavoriteError::CollectionNotFound(collection_id))
}
