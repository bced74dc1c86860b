//! Read-only access to the exercise and program catalog.
//!
//! The catalog is curated by administrators outside this service, so there is
//! no write side.

use async_trait::async_trait;

use crate::domain::catalog::{
    Edition, EditionExercise, Exercise, ExerciseDetail, MuscleGroup, ProgramDetail, ProgramSummary,
};
use crate::domain::foundation::{DomainError, EditionId, ExerciseId, MuscleGroupId, ProgramId};

#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// All muscle groups ordered by display order, then name.
    async fn list_muscle_groups(&self) -> Result<Vec<MuscleGroup>, DomainError>;

    /// Case-insensitive lookup by name.
    async fn find_muscle_group_by_name(&self, name: &str)
        -> Result<Option<MuscleGroup>, DomainError>;

    /// Exercises ordered by name, optionally restricted to one muscle group.
    async fn list_exercises(
        &self,
        muscle_group: Option<MuscleGroupId>,
    ) -> Result<Vec<Exercise>, DomainError>;

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, DomainError>;

    /// Exercise with its muscle group and instructions.
    async fn get_exercise_detail(&self, id: ExerciseId)
        -> Result<Option<ExerciseDetail>, DomainError>;

    /// Active programs with their edition counts.
    async fn list_active_programs(&self) -> Result<Vec<ProgramSummary>, DomainError>;

    async fn get_program_detail(&self, id: ProgramId) -> Result<Option<ProgramDetail>, DomainError>;

    async fn get_edition(&self, id: EditionId) -> Result<Option<Edition>, DomainError>;

    /// Exercises of an edition ordered by day, then insertion order.
    async fn list_edition_exercises(
        &self,
        edition_id: EditionId,
    ) -> Result<Vec<EditionExercise>, DomainError>;
}
