//! HTTP adapter for favorites and collections.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CollectionResponse, CreateCollectionRequest, FavoriteEntryResponse, MoveFavoriteRequest,
    ToggleFavoriteRequest, ToggleFavoriteResponse,
};
pub use handlers::{FavoriteApiError, FavoriteHandlers};
pub use routes::favorite_routes;
