//! HTTP routes for favorite endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    create_collection, delete_collection, list_collections, list_favorites, move_favorite,
    remove_favorite, toggle_favorite, FavoriteHandlers,
};

/// Favorite and collection routes, relative to `/api`. All require a session.
pub fn favorite_routes(handlers: FavoriteHandlers) -> Router {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/toggle/:exercise_id", post(toggle_favorite))
        .route(
            "/favorites/collections",
            get(list_collections).post(create_collection),
        )
        .route("/favorites/collections/:id", delete(delete_collection))
        .route("/favorites/:favorite_id", delete(remove_favorite))
        .route("/favorites/:favorite_id/collection", put(move_favorite))
        .with_state(handlers)
}
