//! HTTP handlers for favorite endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::api_error;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::favorites::{
    CreateCollectionCommand, CreateCollectionHandler, DeleteCollectionCommand,
    DeleteCollectionHandler, ListCollectionsHandler, ListCollectionsQuery, ListFavoritesHandler,
    ListFavoritesQuery, MoveFavoriteCommand, MoveFavoriteHandler, RemoveFavoriteCommand,
    RemoveFavoriteHandler, ToggleFavoriteCommand, ToggleFavoriteHandler,
};
use crate::domain::favorites::{Favorite, FavoriteError};
use crate::domain::foundation::{CollectionId, ExerciseId, FavoriteId};

use super::dto::{
    CollectionResponse, CreateCollectionRequest, FavoriteEntryResponse, MoveFavoriteRequest,
    ToggleFavoriteRequest, ToggleFavoriteResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct FavoriteHandlers {
    pub toggle: Arc<ToggleFavoriteHandler>,
    pub list: Arc<ListFavoritesHandler>,
    pub remove: Arc<RemoveFavoriteHandler>,
    pub create_collection: Arc<CreateCollectionHandler>,
    pub list_collections: Arc<ListCollectionsHandler>,
    pub delete_collection: Arc<DeleteCollectionHandler>,
    pub move_favorite: Arc<MoveFavoriteHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/favorites - Newest first
pub async fn list_favorites(
    State(handlers): State<FavoriteHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<FavoriteEntryResponse>>, FavoriteApiError> {
    let entries = handlers
        .list
        .handle(ListFavoritesQuery { user_id: user.id })
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /api/favorites/toggle/:exercise_id
pub async fn toggle_favorite(
    State(handlers): State<FavoriteHandlers>,
    RequireAuth(user): RequireAuth,
    Path(exercise_id): Path<i64>,
    body: Option<Json<ToggleFavoriteRequest>>,
) -> Result<Json<ToggleFavoriteResponse>, FavoriteApiError> {
    let Json(req) = body.unwrap_or_default();
    let outcome = handlers
        .toggle
        .handle(ToggleFavoriteCommand {
            user_id: user.id,
            exercise_id: ExerciseId::new(exercise_id),
            collection_id: req.collection_id.map(CollectionId::new),
            notes: req.notes,
        })
        .await?;
    Ok(Json(outcome.into()))
}

/// DELETE /api/favorites/:favorite_id
pub async fn remove_favorite(
    State(handlers): State<FavoriteHandlers>,
    RequireAuth(user): RequireAuth,
    Path(favorite_id): Path<i64>,
) -> Result<StatusCode, FavoriteApiError> {
    handlers
        .remove
        .handle(RemoveFavoriteCommand {
            user_id: user.id,
            favorite_id: FavoriteId::new(favorite_id),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/favorites/:favorite_id/collection
pub async fn move_favorite(
    State(handlers): State<FavoriteHandlers>,
    RequireAuth(user): RequireAuth,
    Path(favorite_id): Path<i64>,
    Json(req): Json<MoveFavoriteRequest>,
) -> Result<Json<Favorite>, FavoriteApiError> {
    let favorite = handlers
        .move_favorite
        .handle(MoveFavoriteCommand {
            user_id: user.id,
            favorite_id: FavoriteId::new(favorite_id),
            collection_id: req.collection_id.map(CollectionId::new),
        })
        .await?;
    Ok(Json(favorite))
}

/// GET /api/favorites/collections
pub async fn list_collections(
    State(handlers): State<FavoriteHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<CollectionResponse>>, FavoriteApiError> {
    let collections = handlers
        .list_collections
        .handle(ListCollectionsQuery { user_id: user.id })
        .await?;
    Ok(Json(collections.into_iter().map(Into::into).collect()))
}

/// POST /api/favorites/collections
pub async fn create_collection(
    State(handlers): State<FavoriteHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionResponse>), FavoriteApiError> {
    let collection = handlers
        .create_collection
        .handle(CreateCollectionCommand {
            user_id: user.id,
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(collection.into())))
}

/// DELETE /api/favorites/collections/:id
pub async fn delete_collection(
    State(handlers): State<FavoriteHandlers>,
    RequireAuth(user): RequireAuth,
    Path(collection_id): Path<i64>,
) -> Result<StatusCode, FavoriteApiError> {
    handlers
        .delete_collection
        .handle(DeleteCollectionCommand {
            user_id: user.id,
            collection_id: CollectionId::new(collection_id),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

api_error!(FavoriteApiError, FavoriteError);
