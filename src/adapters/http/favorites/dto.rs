//! HTTP DTOs for favorite endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Exercise;
use crate::domain::favorites::{
    CollectionSummary, Favorite, FavoriteCollection, FavoriteEntry, ToggleOutcome,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Optional body of a toggle; only used when the toggle adds a favorite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToggleFavoriteRequest {
    #[serde(default)]
    pub collection_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `collection_id: null` takes the favorite out of its collection.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveFavoriteRequest {
    #[serde(default)]
    pub collection_id: Option<i64>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ToggleFavoriteResponse {
    pub is_favorited: bool,
    pub favorite: Option<Favorite>,
}

impl From<ToggleOutcome> for ToggleFavoriteResponse {
    fn from(outcome: ToggleOutcome) -> Self {
        Self {
            is_favorited: outcome.is_favorited(),
            favorite: match outcome {
                ToggleOutcome::Added(favorite) => Some(favorite),
                ToggleOutcome::Removed(_) => None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteEntryResponse {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub exercise: Exercise,
}

impl From<FavoriteEntry> for FavoriteEntryResponse {
    fn from(entry: FavoriteEntry) -> Self {
        Self {
            favorite: entry.favorite,
            exercise: entry.exercise,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionResponse {
    #[serde(flatten)]
    pub collection: FavoriteCollection,
    pub exercise_count: i64,
}

impl From<CollectionSummary> for CollectionResponse {
    fn from(summary: CollectionSummary) -> Self {
        Self {
            collection: summary.collection,
            exercise_count: summary.exercise_count,
        }
    }
}

impl From<FavoriteCollection> for CollectionResponse {
    fn from(collection: FavoriteCollection) -> Self {
        Self {
            collection,
            exercise_count: 0,
        }
    }
}
