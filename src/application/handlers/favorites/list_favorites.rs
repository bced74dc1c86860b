//! ListFavoritesHandler - the user's favorites, newest first.

use std::sync::Arc;

use crate::domain::favorites::{FavoriteEntry, FavoriteError};
use crate::domain::foundation::UserId;
use crate::ports::FavoriteRepository;

#[derive(Debug, Clone)]
pub struct ListFavoritesQuery {
    pub user_id: UserId,
}

pub struct ListFavoritesHandler {
    favorites: Arc<dyn FavoriteRepository>,
}

impl ListFavoritesHandler {
    pub fn new(favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorites }
    }

    pub async fn handle(&self, query: ListFavoritesQuery) -> Result<Vec<FavoriteEntry>, FavoriteError> {
        Ok(self.favorites.list_entries(query.user_id).await?)
    }
}
