//! Collection handlers - create, list and delete named favorite groups.

use std::sync::Arc;

use super::owned_collection;
use crate::domain::favorites::{CollectionSummary, FavoriteCollection, FavoriteError, NewCollection};
use crate::domain::foundation::{CollectionId, UserId};
use crate::ports::FavoriteRepository;

#[derive(Debug, Clone)]
pub struct CreateCollectionCommand {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
}

/// Names are unique per user; a duplicate is a conflict.
pub struct CreateCollectionHandler {
    favorites: Arc<dyn FavoriteRepository>,
}

impl CreateCollectionHandler {
    pub fn new(favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorites }
    }

    pub async fn handle(&self, cmd: CreateCollectionCommand) -> Result<FavoriteCollection, FavoriteError> {
        let new_collection = NewCollection::new(cmd.user_id, &cmd.name, cmd.description)?;
        let collection = self.favorites.create_collection(new_collection).await?;
        tracing::debug!(user_id = %cmd.user_id, collection_id = %collection.id, "collection created");
        Ok(collection)
    }
}

#[derive(Debug, Clone)]
pub struct ListCollectionsQuery {
    pub user_id: UserId,
}

pub struct ListCollectionsHandler {
    favorites: Arc<dyn FavoriteRepository>,
}

impl ListCollectionsHandler {
    pub fn new(favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorites }
    }

    pub async fn handle(&self, query: ListCollectionsQuery) -> Result<Vec<CollectionSummary>, FavoriteError> {
        Ok(self.favorites.list_collections(query.user_id).await?)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteCollectionCommand {
    pub user_id: UserId,
    pub collection_id: CollectionId,
}

/// Deleting a collection keeps its favorites and clears their link.
pub struct DeleteCollectionHandler {
    favorites: Arc<dyn FavoriteRepository>,
}

impl DeleteCollectionHandler {
    pub fn new(favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { favorites }
    }

    pub async fn handle(&self, cmd: DeleteCollectionCommand) -> Result<(), FavoriteError> {
        let collection = owned_collection(self.favorites.as_ref(), cmd.user_id, cmd.collection_id).await?;
        if !self.favorites.delete_collection(collection.id).await? {
            return Err(FavoriteError::CollectionNotFound(cmd.collection_id));
        }
        Ok(())
    }
}
