//! PostgreSQL implementation of FavoriteRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::catalog_reader::ExerciseRow;
use super::{is_unique_violation, timestamp};
use crate::domain::catalog::Exercise;
use crate::domain::favorites::{
    CollectionSummary, Favorite, FavoriteCollection, FavoriteEntry, NewCollection, NewFavorite,
};
use crate::domain::foundation::{
    CollectionId, DomainError, ErrorCode, ExerciseId, FavoriteId, Timestamp, UserId,
};
use crate::ports::FavoriteRepository;

const SELECT_FAVORITE: &str = r#"
    SELECT id, user_id, exercise_id, collection_id, notes, created_at
    FROM favorites
"#;

pub struct PostgresFavoriteRepository {
    pool: PgPool,
}

impl PostgresFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
    id: i64,
    user_id: i64,
    exercise_id: i64,
    collection_id: Option<i64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: FavoriteId::new(row.id),
            user_id: UserId::new(row.user_id),
            exercise_id: ExerciseId::new(row.exercise_id),
            collection_id: row.collection_id.map(CollectionId::new),
            notes: row.notes,
            created_at: timestamp(row.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FavoriteEntryRow {
    favorite_id: i64,
    favorite_user_id: i64,
    favorite_collection_id: Option<i64>,
    favorite_notes: Option<String>,
    favorite_created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    exercise: ExerciseRow,
}

impl TryFrom<FavoriteEntryRow> for FavoriteEntry {
    type Error = DomainError;

    fn try_from(row: FavoriteEntryRow) -> Result<Self, Self::Error> {
        let exercise = Exercise::try_from(row.exercise)?;
        Ok(FavoriteEntry {
            favorite: Favorite {
                id: FavoriteId::new(row.favorite_id),
                user_id: UserId::new(row.favorite_user_id),
                exercise_id: exercise.id,
                collection_id: row.favorite_collection_id.map(CollectionId::new),
                notes: row.favorite_notes,
                created_at: timestamp(row.favorite_created_at),
            },
            exercise,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: i64,
    user_id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CollectionRow> for FavoriteCollection {
    fn from(row: CollectionRow) -> Self {
        FavoriteCollection {
            id: CollectionId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            description: row.description,
            created_at: timestamp(row.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionSummaryRow {
    #[sqlx(flatten)]
    collection: CollectionRow,
    exercise_count: i64,
}

#[async_trait]
impl FavoriteRepository for PostgresFavoriteRepository {
    async fn find(
        &self,
        user_id: UserId,
        exercise_id: ExerciseId,
    ) -> Result<Option<Favorite>, DomainError> {
        let row: Option<FavoriteRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND exercise_id = $2",
            SELECT_FAVORITE
        ))
        .bind(user_id.as_i64())
        .bind(exercise_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find favorite", e))?;

        Ok(row.map(Favorite::from))
    }

    async fn find_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>, DomainError> {
        let row: Option<FavoriteRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_FAVORITE))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to find favorite", e))?;

        Ok(row.map(Favorite::from))
    }

    #[tracing::instrument(skip(self, favorite), fields(user_id = %favorite.user_id, exercise_id = %favorite.exercise_id))]
    async fn create(&self, favorite: NewFavorite) -> Result<Favorite, DomainError> {
        let now = Timestamp::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO favorites (user_id, exercise_id, collection_id, notes, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(favorite.user_id.as_i64())
        .bind(favorite.exercise_id.as_i64())
        .bind(favorite.collection_id.map(|c| c.as_i64()))
        .bind(&favorite.notes)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "favorites_user_exercise_key") {
                return DomainError::new(ErrorCode::FavoriteExists, "Exercise already in favorites");
            }
            DomainError::database("Failed to create favorite", e)
        })?;

        Ok(favorite.into_favorite(FavoriteId::new(id), now))
    }

    async fn delete(&self, id: FavoriteId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete favorite", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_entries(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, DomainError> {
        let rows: Vec<FavoriteEntryRow> = sqlx::query_as(
            r#"
            SELECT f.id AS favorite_id, f.user_id AS favorite_user_id,
                   f.collection_id AS favorite_collection_id, f.notes AS favorite_notes,
                   f.created_at AS favorite_created_at,
                   e.id, e.name, e.name_uz, e.muscle_group_id, e.description, e.difficulty,
                   e.equipment, e.thumbnail_url, e.image_url, e.video_url
            FROM favorites f
            JOIN exercises e ON e.id = f.exercise_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list favorites", e))?;

        rows.into_iter().map(FavoriteEntry::try_from).collect()
    }

    async fn favorited_exercise_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExerciseId>, DomainError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT exercise_id FROM favorites WHERE user_id = $1")
            .bind(user_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list favorite ids", e))?;

        Ok(ids.into_iter().map(ExerciseId::new).collect())
    }

    async fn set_collection(
        &self,
        id: FavoriteId,
        collection_id: Option<CollectionId>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE favorites SET collection_id = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(collection_id.map(|c| c.as_i64()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to move favorite", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::FavoriteNotFound, "Favorite not found"));
        }
        Ok(())
    }

    async fn create_collection(
        &self,
        collection: NewCollection,
    ) -> Result<FavoriteCollection, DomainError> {
        let now = Timestamp::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO favorite_collections (user_id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(collection.user_id.as_i64())
        .bind(&collection.name)
        .bind(&collection.description)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "favorite_collections_user_name_key") {
                return DomainError::new(
                    ErrorCode::CollectionExists,
                    format!("Collection '{}' already exists", collection.name),
                );
            }
            DomainError::database("Failed to create collection", e)
        })?;

        Ok(collection.into_collection(CollectionId::new(id), now))
    }

    async fn find_collection(
        &self,
        id: CollectionId,
    ) -> Result<Option<FavoriteCollection>, DomainError> {
        let row: Option<CollectionRow> = sqlx::query_as(
            "SELECT id, user_id, name, description, created_at FROM favorite_collections WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load collection", e))?;

        Ok(row.map(FavoriteCollection::from))
    }

    async fn list_collections(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CollectionSummary>, DomainError> {
        let rows: Vec<CollectionSummaryRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.user_id, c.name, c.description, c.created_at,
                   COUNT(f.id) AS exercise_count
            FROM favorite_collections c
            LEFT JOIN favorites f ON f.collection_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list collections", e))?;

        Ok(rows
            .into_iter()
            .map(|row| CollectionSummary {
                collection: row.collection.into(),
                exercise_count: row.exercise_count,
            })
            .collect())
    }

    async fn delete_collection(&self, id: CollectionId) -> Result<bool, DomainError> {
        // favorites.collection_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM favorite_collections WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete collection", e))?;

        Ok(result.rows_affected() > 0)
    }
}
