//! Favorite exercises and named collections.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Exercise;
use crate::domain::foundation::{
    CollectionId, ExerciseId, FavoriteId, Timestamp, UserId, ValidationError,
};

const MAX_COLLECTION_NAME_LEN: usize = 100;
const MAX_NOTES_LEN: usize = 1000;

/// A user's saved exercise. `(user_id, exercise_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    pub collection_id: Option<CollectionId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

impl Favorite {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Insert data for a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFavorite {
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    pub collection_id: Option<CollectionId>,
    pub notes: Option<String>,
}

impl NewFavorite {
    pub fn new(user_id: UserId, exercise_id: ExerciseId) -> Self {
        Self {
            user_id,
            exercise_id,
            collection_id: None,
            notes: None,
        }
    }

    pub fn in_collection(mut self, collection_id: Option<CollectionId>) -> Self {
        self.collection_id = collection_id;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Result<Self, ValidationError> {
        self.notes = validate_notes(notes)?;
        Ok(self)
    }

    pub fn into_favorite(self, id: FavoriteId, now: Timestamp) -> Favorite {
        Favorite {
            id,
            user_id: self.user_id,
            exercise_id: self.exercise_id,
            collection_id: self.collection_id,
            notes: self.notes,
            created_at: now,
        }
    }
}

/// Result of flipping a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added(Favorite),
    Removed(FavoriteId),
}

impl ToggleOutcome {
    /// Whether the exercise is a favorite after the toggle.
    pub fn is_favorited(&self) -> bool {
        matches!(self, ToggleOutcome::Added(_))
    }
}

/// A favorite joined with the exercise it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub favorite: Favorite,
    pub exercise: Exercise,
}

/// Named group of favorites. `(user_id, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteCollection {
    pub id: CollectionId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

impl FavoriteCollection {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Insert data for a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollection {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
}

impl NewCollection {
    pub fn new(
        user_id: UserId,
        name: &str,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let len = name.chars().count();
        if len > MAX_COLLECTION_NAME_LEN {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_COLLECTION_NAME_LEN as i64,
                len as i64,
            ));
        }
        Ok(Self {
            user_id,
            name: name.to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }

    pub fn into_collection(self, id: CollectionId, now: Timestamp) -> FavoriteCollection {
        FavoriteCollection {
            id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            created_at: now,
        }
    }
}

/// Collection with the number of favorites filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub collection: FavoriteCollection,
    pub exercise_count: i64,
}

fn validate_notes(notes: Option<String>) -> Result<Option<String>, ValidationError> {
    let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    if let Some(text) = &notes {
        let len = text.chars().count();
        if len > MAX_NOTES_LEN {
            return Err(ValidationError::out_of_range(
                "notes",
                0,
                MAX_NOTES_LEN as i64,
                len as i64,
            ));
        }
    }
    Ok(notes)
}
