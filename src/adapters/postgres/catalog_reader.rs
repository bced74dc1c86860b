//! PostgreSQL implementation of CatalogReader.

use async_trait::async_trait;
use sqlx::PgPool;

use super::parse_column;
use crate::domain::catalog::{
    Edition, EditionExercise, Exercise, ExerciseDetail, ExerciseInstruction, MuscleGroup,
    Program, ProgramDetail, ProgramSummary,
};
use crate::domain::foundation::{
    DomainError, EditionId, ExerciseId, MuscleGroupId, ProgramId,
};
use crate::ports::CatalogReader;

const EXERCISE_COLUMNS: &str = r#"
    e.id, e.name, e.name_uz, e.muscle_group_id, e.description, e.difficulty,
    e.equipment, e.thumbnail_url, e.image_url, e.video_url
"#;

pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MuscleGroupRow {
    id: i64,
    name: String,
    name_uz: Option<String>,
    image_url: Option<String>,
    display_order: i32,
}

impl From<MuscleGroupRow> for MuscleGroup {
    fn from(row: MuscleGroupRow) -> Self {
        MuscleGroup {
            id: MuscleGroupId::new(row.id),
            name: row.name,
            name_uz: row.name_uz,
            image_url: row.image_url,
            display_order: row.display_order,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ExerciseRow {
    id: i64,
    name: String,
    name_uz: Option<String>,
    muscle_group_id: i64,
    description: Option<String>,
    difficulty: String,
    equipment: Option<String>,
    thumbnail_url: Option<String>,
    image_url: Option<String>,
    video_url: Option<String>,
}

impl TryFrom<ExerciseRow> for Exercise {
    type Error = DomainError;

    fn try_from(row: ExerciseRow) -> Result<Self, Self::Error> {
        Ok(Exercise {
            id: ExerciseId::new(row.id),
            name: row.name,
            name_uz: row.name_uz,
            muscle_group_id: MuscleGroupId::new(row.muscle_group_id),
            description: row.description,
            difficulty: parse_column("difficulty", &row.difficulty)?,
            equipment: row.equipment,
            thumbnail_url: row.thumbnail_url,
            image_url: row.image_url,
            video_url: row.video_url,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InstructionRow {
    step_number: i32,
    text: String,
    text_uz: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProgramRow {
    id: i64,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    is_active: bool,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Program {
            id: ProgramId::new(row.id),
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProgramSummaryRow {
    #[sqlx(flatten)]
    program: ProgramRow,
    edition_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct EditionRow {
    id: i64,
    program_id: i64,
    title: String,
    display_order: i32,
    duration_weeks: i32,
    days_per_week: i32,
    description: Option<String>,
    image_url: Option<String>,
}

impl From<EditionRow> for Edition {
    fn from(row: EditionRow) -> Self {
        Edition {
            id: EditionId::new(row.id),
            program_id: ProgramId::new(row.program_id),
            title: row.title,
            display_order: row.display_order,
            duration_weeks: row.duration_weeks,
            days_per_week: row.days_per_week,
            description: row.description,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EditionExerciseRow {
    exercise_id: i64,
    exercise_name: String,
    thumbnail_url: Option<String>,
    sets: i32,
    reps: Option<i32>,
    minutes: Option<i32>,
    day_number: i32,
}

impl From<EditionExerciseRow> for EditionExercise {
    fn from(row: EditionExerciseRow) -> Self {
        EditionExercise {
            exercise_id: ExerciseId::new(row.exercise_id),
            exercise_name: row.exercise_name,
            thumbnail_url: row.thumbnail_url,
            sets: row.sets,
            reps: row.reps,
            minutes: row.minutes,
            day_number: row.day_number,
        }
    }
}

const SELECT_EDITION: &str = r#"
    SELECT id, program_id, title, display_order, duration_weeks, days_per_week,
           description, image_url
    FROM editions
"#;

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn list_muscle_groups(&self) -> Result<Vec<MuscleGroup>, DomainError> {
        let rows: Vec<MuscleGroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, name_uz, image_url, display_order
            FROM muscle_groups
            ORDER BY display_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list muscle groups", e))?;

        Ok(rows.into_iter().map(MuscleGroup::from).collect())
    }

    async fn find_muscle_group_by_name(
        &self,
        name: &str,
    ) -> Result<Option<MuscleGroup>, DomainError> {
        let row: Option<MuscleGroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, name_uz, image_url, display_order
            FROM muscle_groups
            WHERE LOWER(name) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find muscle group", e))?;

        Ok(row.map(MuscleGroup::from))
    }

    async fn list_exercises(
        &self,
        muscle_group: Option<MuscleGroupId>,
    ) -> Result<Vec<Exercise>, DomainError> {
        let rows: Vec<ExerciseRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM exercises e
            WHERE $1::BIGINT IS NULL OR e.muscle_group_id = $1
            ORDER BY e.name
            "#,
            EXERCISE_COLUMNS
        ))
        .bind(muscle_group.map(|id| id.as_i64()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list exercises", e))?;

        rows.into_iter().map(Exercise::try_from).collect()
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, DomainError> {
        let row: Option<ExerciseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM exercises e WHERE e.id = $1",
            EXERCISE_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load exercise", e))?;

        row.map(Exercise::try_from).transpose()
    }

    async fn get_exercise_detail(
        &self,
        id: ExerciseId,
    ) -> Result<Option<ExerciseDetail>, DomainError> {
        let Some(exercise) = self.get_exercise(id).await? else {
            return Ok(None);
        };

        let group: Option<MuscleGroupRow> = sqlx::query_as(
            "SELECT id, name, name_uz, image_url, display_order FROM muscle_groups WHERE id = $1",
        )
        .bind(exercise.muscle_group_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load muscle group", e))?;
        let Some(group) = group else {
            return Ok(None);
        };

        let instructions: Vec<InstructionRow> = sqlx::query_as(
            r#"
            SELECT step_number, text, text_uz
            FROM exercise_instructions
            WHERE exercise_id = $1
            ORDER BY step_number
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load instructions", e))?;

        Ok(Some(ExerciseDetail {
            exercise,
            muscle_group: group.into(),
            instructions: instructions
                .into_iter()
                .map(|row| ExerciseInstruction {
                    step_number: row.step_number,
                    text: row.text,
                    text_uz: row.text_uz,
                })
                .collect(),
        }))
    }

    async fn list_active_programs(&self) -> Result<Vec<ProgramSummary>, DomainError> {
        let rows: Vec<ProgramSummaryRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.title, p.description, p.image_url, p.is_active,
                   COUNT(ed.id) AS edition_count
            FROM programs p
            LEFT JOIN editions ed ON ed.program_id = p.id
            WHERE p.is_active
            GROUP BY p.id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list programs", e))?;

        Ok(rows
            .into_iter()
            .map(|row| ProgramSummary {
                program: row.program.into(),
                edition_count: row.edition_count,
            })
            .collect())
    }

    async fn get_program_detail(
        &self,
        id: ProgramId,
    ) -> Result<Option<ProgramDetail>, DomainError> {
        let program: Option<ProgramRow> = sqlx::query_as(
            "SELECT id, title, description, image_url, is_active FROM programs WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load program", e))?;
        let Some(program) = program else {
            return Ok(None);
        };

        let editions: Vec<EditionRow> =
            sqlx::query_as(&format!("{} WHERE program_id = $1", SELECT_EDITION))
                .bind(id.as_i64())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to load editions", e))?;

        Ok(Some(ProgramDetail::new(
            program.into(),
            editions.into_iter().map(Edition::from).collect(),
        )))
    }

    async fn get_edition(&self, id: EditionId) -> Result<Option<Edition>, DomainError> {
        let row: Option<EditionRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_EDITION))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load edition", e))?;

        Ok(row.map(Edition::from))
    }

    async fn list_edition_exercises(
        &self,
        edition_id: EditionId,
    ) -> Result<Vec<EditionExercise>, DomainError> {
        let rows: Vec<EditionExerciseRow> = sqlx::query_as(
            r#"
            SELECT ee.exercise_id, e.name AS exercise_name, e.thumbnail_url,
                   ee.sets, ee.reps, ee.minutes, ee.day_number
            FROM edition_exercises ee
            JOIN exercises e ON e.id = ee.exercise_id
            WHERE ee.edition_id = $1
            ORDER BY ee.day_number, ee.id
            "#,
        )
        .bind(edition_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load edition exercises", e))?;

        Ok(rows.into_iter().map(EditionExercise::from).collect())
    }
}
