//! In-memory catalog, seeded through the `add_*` methods.

use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;
use crate::domain::catalog::{
    Difficulty, Edition, EditionExercise, Exercise, ExerciseDetail, ExerciseInstruction,
    MuscleGroup, Program, ProgramDetail, ProgramSummary,
};
use crate::domain::foundation::{DomainError, EditionId, ExerciseId, MuscleGroupId, ProgramId};
use crate::ports::CatalogReader;

#[derive(Default)]
struct CatalogData {
    muscle_groups: Vec<MuscleGroup>,
    exercises: Vec<Exercise>,
    instructions: Vec<(ExerciseId, ExerciseInstruction)>,
    programs: Vec<Program>,
    editions: Vec<Edition>,
    plan: Vec<(EditionId, EditionExercise)>,
}

#[derive(Default)]
pub struct InMemoryCatalog {
    data: Mutex<CatalogData>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_muscle_group(&self, group: MuscleGroup) {
        if let Ok(mut data) = self.data.lock() {
            data.muscle_groups.push(group);
        }
    }

    pub fn add_exercise(&self, exercise: Exercise) {
        if let Ok(mut data) = self.data.lock() {
            data.exercises.push(exercise);
        }
    }

    pub fn add_instruction(&self, exercise_id: ExerciseId, instruction: ExerciseInstruction) {
        if let Ok(mut data) = self.data.lock() {
            data.instructions.push((exercise_id, instruction));
        }
    }

    pub fn add_program(&self, program: Program) {
        if let Ok(mut data) = self.data.lock() {
            data.programs.push(program);
        }
    }

    pub fn add_edition(&self, edition: Edition) {
        if let Ok(mut data) = self.data.lock() {
            data.editions.push(edition);
        }
    }

    pub fn add_edition_exercise(&self, edition_id: EditionId, item: EditionExercise) {
        if let Ok(mut data) = self.data.lock() {
            data.plan.push((edition_id, item));
        }
    }

    /// Small catalog for tests and local runs.
    ///
    /// Muscle groups Chest (1) and Legs (2); exercises Bench Press (1), Push Up (2)
    /// and Squat (3); an active program (1) with editions 1 and 2 and an inactive
    /// program (2). Edition 1 schedules chest work on day 1 and squats on day 2.
    pub fn sample() -> Self {
        let catalog = Self::new();
        for (id, name, name_uz, order) in [(1, "Chest", "Ko'krak", 1), (2, "Legs", "Oyoqlar", 2)] {
            catalog.add_muscle_group(MuscleGroup {
                id: MuscleGroupId::new(id),
                name: name.to_string(),
                name_uz: Some(name_uz.to_string()),
                image_url: None,
                display_order: order,
            });
        }
        for (id, name, muscle) in [(1, "Bench Press", 1), (2, "Push Up", 1), (3, "Squat", 2)] {
            catalog.add_exercise(Exercise {
                id: ExerciseId::new(id),
                name: name.to_string(),
                name_uz: None,
                muscle_group_id: MuscleGroupId::new(muscle),
                description: None,
                difficulty: Difficulty::default(),
                equipment: None,
                thumbnail_url: None,
                image_url: None,
                video_url: None,
            });
        }
        catalog.add_instruction(
            ExerciseId::new(1),
            ExerciseInstruction {
                step_number: 2,
                text: "Press the bar up\n\n  Lock out  ".to_string(),
                text_uz: None,
            },
        );
        catalog.add_instruction(
            ExerciseId::new(1),
            ExerciseInstruction {
                step_number: 1,
                text: "Lie on the bench".to_string(),
                text_uz: None,
            },
        );
        for (id, title, active) in [(1, "Strength Start", true), (2, "Retired Plan", false)] {
            catalog.add_program(Program {
                id: ProgramId::new(id),
                title: title.to_string(),
                description: None,
                image_url: None,
                is_active: active,
            });
        }
        for (id, order) in [(1, 1), (2, 2)] {
            catalog.add_edition(Edition {
                id: EditionId::new(id),
                program_id: ProgramId::new(1),
                title: format!("Edition {}", id),
                display_order: order,
                duration_weeks: 4,
                days_per_week: 3,
                description: None,
                image_url: None,
            });
        }
        for (exercise, name, day) in [(1, "Bench Press", 1), (2, "Push Up", 1), (3, "Squat", 2)] {
            catalog.add_edition_exercise(
                EditionId::new(1),
                EditionExercise {
                    exercise_id: ExerciseId::new(exercise),
                    exercise_name: name.to_string(),
                    thumbnail_url: None,
                    sets: 3,
                    reps: Some(10),
                    minutes: None,
                    day_number: day,
                },
            );
        }
        catalog
    }

    /// Exercise lookup without going through the async port.
    pub(crate) fn exercise(&self, id: ExerciseId) -> Option<Exercise> {
        self.data
            .lock()
            .ok()
            .and_then(|data| data.exercises.iter().find(|e| e.id == id).cloned())
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn list_muscle_groups(&self) -> Result<Vec<MuscleGroup>, DomainError> {
        let mut groups = lock(&self.data)?.muscle_groups.clone();
        groups.sort_by(|a, b| (a.display_order, &a.name).cmp(&(b.display_order, &b.name)));
        Ok(groups)
    }

    async fn find_muscle_group_by_name(
        &self,
        name: &str,
    ) -> Result<Option<MuscleGroup>, DomainError> {
        Ok(lock(&self.data)?
            .muscle_groups
            .iter()
            .find(|g| g.matches_name(name))
            .cloned())
    }

    async fn list_exercises(
        &self,
        muscle_group: Option<MuscleGroupId>,
    ) -> Result<Vec<Exercise>, DomainError> {
        let mut exercises: Vec<Exercise> = lock(&self.data)?
            .exercises
            .iter()
            .filter(|e| muscle_group.map_or(true, |g| e.muscle_group_id == g))
            .cloned()
            .collect();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, DomainError> {
        Ok(lock(&self.data)?.exercises.iter().find(|e| e.id == id).cloned())
    }

    async fn get_exercise_detail(
        &self,
        id: ExerciseId,
    ) -> Result<Option<ExerciseDetail>, DomainError> {
        let data = lock(&self.data)?;
        let Some(exercise) = data.exercises.iter().find(|e| e.id == id).cloned() else {
            return Ok(None);
        };
        let Some(muscle_group) = data
            .muscle_groups
            .iter()
            .find(|g| g.id == exercise.muscle_group_id)
            .cloned()
        else {
            return Ok(None);
        };
        let instructions = data
            .instructions
            .iter()
            .filter(|(exercise_id, _)| *exercise_id == id)
            .map(|(_, step)| step.clone())
            .collect();
        Ok(Some(ExerciseDetail {
            exercise,
            muscle_group,
            instructions,
        }))
    }

    async fn list_active_programs(&self) -> Result<Vec<ProgramSummary>, DomainError> {
        let data = lock(&self.data)?;
        Ok(data
            .programs
            .iter()
            .filter(|p| p.is_active)
            .map(|p| ProgramSummary {
                program: p.clone(),
                edition_count: data.editions.iter().filter(|e| e.program_id == p.id).count() as i64,
            })
            .collect())
    }

    async fn get_program_detail(&self, id: ProgramId) -> Result<Option<ProgramDetail>, DomainError> {
        let data = lock(&self.data)?;
        let Some(program) = data.programs.iter().find(|p| p.id == id).cloned() else {
            return Ok(None);
        };
        let editions = data
            .editions
            .iter()
            .filter(|e| e.program_id == id)
            .cloned()
            .collect();
        Ok(Some(ProgramDetail::new(program, editions)))
    }

    async fn get_edition(&self, id: EditionId) -> Result<Option<Edition>, DomainError> {
        Ok(lock(&self.data)?.editions.iter().find(|e| e.id == id).cloned())
    }

    async fn list_edition_exercises(
        &self,
        edition_id: EditionId,
    ) -> Result<Vec<EditionExercise>, DomainError> {
        let mut items: Vec<EditionExercise> = lock(&self.data)?
            .plan
            .iter()
            .filter(|(id, _)| *id == edition_id)
            .map(|(_, item)| item.clone())
            .collect();
        items.sort_by_key(|item| item.day_number);
        Ok(items)
    }
}
