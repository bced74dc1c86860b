//! FavoriteRepository port for favorites and collections.

use async_trait::async_trait;

use crate::domain::favorites::{
    CollectionSummary, Favorite, FavoriteCollection, FavoriteEntry, NewCollection, NewFavorite,
};
use crate::domain::foundation::{CollectionId, DomainError, ExerciseId, FavoriteId, UserId};

/// Persistence for favorite exercises and user collections.
///
/// # Contract
///
/// - `(user_id, exercise_id)` is unique among favorites; `create` reports a
///   duplicate with `ErrorCode::FavoriteExists`.
/// - Collection names are unique per user; `create_collection` reports a
///   duplicate with `ErrorCode::CollectionExists`.
/// - Deleting a collection keeps its favorites and clears their link.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn find(
        &self,
        user_id: UserId,
        exercise_id: ExerciseId,
    ) -> Result<Option<Favorite>, DomainError>;

    async fn find_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>, DomainError>;

    async fn create(&self, favorite: NewFavorite) -> Result<Favorite, DomainError>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, id: FavoriteId) -> Result<bool, DomainError>;

    /// Favorites with exercise summaries, newest first.
    async fn list_entries(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, DomainError>;

    async fn favorited_exercise_ids(&self, user_id: UserId)
        -> Result<Vec<ExerciseId>, DomainError>;

    async fn set_collection(
        &self,
        id: FavoriteId,
        collection_id: Option<CollectionId>,
    ) -> Result<(), DomainError>;

    async fn create_collection(
        &self,
        collection: NewCollection,
    ) -> Result<FavoriteCollection, DomainError>;

    async fn find_collection(
        &self,
        id: CollectionId,
    ) -> Result<Option<FavoriteCollection>, DomainError>;

    /// Collections with exercise counts ordered by name.
    async fn list_collections(&self, user_id: UserId)
        -> Result<Vec<CollectionSummary>, DomainError>;

    async fn delete_collection(&self, id: CollectionId) -> Result<bool, DomainError>;
}
