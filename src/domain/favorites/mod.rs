//! Favorites module - saved exercises and user-defined collections.

mod errors;
mod favorite;

pub use errors::FavoriteError;
pub use favorite::{
    CollectionSummary, Favorite, FavoriteCollection, FavoriteEntry, NewCollection, NewFavorite,
    ToggleOutcome,
};
