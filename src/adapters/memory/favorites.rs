//! In-memory favorites and collections.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use super::{lock, InMemoryCatalog, Sequence};
use crate::domain::favorites::{
    CollectionSummary, Favorite, FavoriteCollection, FavoriteEntry, NewCollection, NewFavorite,
};
use crate::domain::foundation::{
    CollectionId, DomainError, ErrorCode, ExerciseId, FavoriteId, Timestamp, UserId,
};
use crate::ports::FavoriteRepository;

/// Joins exercise summaries from the shared catalog when listing.
pub struct InMemoryFavoriteRepository {
    catalog: Arc<InMemoryCatalog>,
    favorites: Mutex<Vec<Favorite>>,
    collections: Mutex<Vec<FavoriteCollection>>,
    favorite_ids: Sequence,
    collection_ids: Sequence,
}

impl InMemoryFavoriteRepository {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            catalog,
            favorites: Mutex::new(Vec::new()),
            collections: Mutex::new(Vec::new()),
            favorite_ids: Sequence::default(),
            collection_ids: Sequence::default(),
        }
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn find(
        &self,
        user_id: UserId,
        exercise_id: ExerciseId,
    ) -> Result<Option<Favorite>, DomainError> {
        Ok(lock(&self.favorites)?
            .iter()
            .find(|f| f.user_id == user_id && f.exercise_id == exercise_id)
            .cloned())
    }

    async fn find_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>, DomainError> {
        Ok(lock(&self.favorites)?.iter().find(|f| f.id == id).cloned())
    }

    async fn create(&self, favorite: NewFavorite) -> Result<Favorite, DomainError> {
        let mut favorites = lock(&self.favorites)?;
        if favorites
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.exercise_id == favorite.exercise_id)
        {
            return Err(DomainError::new(
                ErrorCode::FavoriteExists,
                "Exercise already in favorites",
            ));
        }
        let created = favorite.into_favorite(FavoriteId::new(self.favorite_ids.next()?), Timestamp::now());
        favorites.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: FavoriteId) -> Result<bool, DomainError> {
        let mut favorites = lock(&self.favorites)?;
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        Ok(favorites.len() != before)
    }

    async fn list_entries(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, DomainError> {
        let mut owned: Vec<Favorite> = lock(&self.favorites)?
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|f| Reverse((f.created_at, f.id)));
        Ok(owned
            .into_iter()
            .filter_map(|favorite| {
                self.catalog
                    .exercise(favorite.exercise_id)
                    .map(|exercise| FavoriteEntry { favorite, exercise })
            })
            .collect())
    }

    async fn favorited_exercise_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExerciseId>, DomainError> {
        Ok(lock(&self.favorites)?
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.exercise_id)
            .collect())
    }

    async fn set_collection(
        &self,
        id: FavoriteId,
        collection_id: Option<CollectionId>,
    ) -> Result<(), DomainError> {
        let mut favorites = lock(&self.favorites)?;
        match favorites.iter_mut().find(|f| f.id == id) {
            Some(favorite) => {
                favorite.collection_id = collection_id;
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::FavoriteNotFound, "Favorite not found")),
        }
    }

    async fn create_collection(
        &self,
        collection: NewCollection,
    ) -> Result<FavoriteCollection, DomainError> {
        let mut collections = lock(&self.collections)?;
        if collections
            .iter()
            .any(|c| c.user_id == collection.user_id && c.name == collection.name)
        {
            return Err(DomainError::new(
                ErrorCode::CollectionExists,
                "Collection with this name already exists",
            )
            .with_detail("name", collection.name));
        }
        let created = collection.into_collection(
            CollectionId::new(self.collection_ids.next()?),
            Timestamp::now(),
        );
        collections.push(created.clone());
        Ok(created)
    }

    async fn find_collection(
        &self,
        id: CollectionId,
    ) -> Result<Option<FavoriteCollection>, DomainError> {
        Ok(lock(&self.collections)?.iter().find(|c| c.id == id).cloned())
    }

    async fn list_collections(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CollectionSummary>, DomainError> {
        let favorites = lock(&self.favorites)?;
        let mut summaries: Vec<CollectionSummary> = lock(&self.collections)?
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| CollectionSummary {
                collection: c.clone(),
                exercise_count: favorites
                    .iter()
                    .filter(|f| f.collection_id == Some(c.id))
                    .count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| a.collection.name.cmp(&b.collection.name));
        Ok(summaries)
    }

    async fn delete_collection(&self, id: CollectionId) -> Result<bool, DomainError> {
        // Same lock order as list_collections.
        let mut favorites = lock(&self.favorites)?;
        let mut collections = lock(&self.collections)?;
        let before = collections.len();
        collections.retain(|c| c.id != id);
        if collections.len() == before {
            return Ok(false);
        }
        for favorite in favorites.iter_mut() {
            if favorite.collection_id == Some(id) {
                favorite.collection_id = None;
            }
        }
        Ok(true)
    }
}
