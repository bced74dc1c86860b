//! HTTP DTOs for catalog endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::catalog::{ExerciseListItem, ExerciseView};
use crate::domain::catalog::{
    Edition, EditionExercise, EditionPlan, Exercise, MuscleGroup, Program, ProgramDetail,
    ProgramSummary,
};
use crate::domain::profile::Language;

/// `?lang=uz|en|ru`; unknown or absent values fall back to the default language.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageParam {
    #[serde(default)]
    pub lang: Option<String>,
}

impl LanguageParam {
    pub fn language(&self) -> Language {
        self.lang
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseItemResponse {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub is_favorited: bool,
}

impl From<ExerciseListItem> for ExerciseItemResponse {
    fn from(item: ExerciseListItem) -> Self {
        Self {
            exercise: item.exercise,
            is_favorited: item.is_favorited,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseDetailResponse {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub display_name: String,
    pub muscle_group: MuscleGroup,
    pub instructions: Vec<String>,
    pub is_favorited: bool,
}

impl ExerciseDetailResponse {
    pub fn new(view: ExerciseView, language: Language) -> Self {
        Self {
            display_name: view.detail.exercise.display_name(language).to_string(),
            exercise: view.detail.exercise,
            muscle_group: view.detail.muscle_group,
            instructions: view.instructions,
            is_favorited: view.is_favorited,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramSummaryResponse {
    #[serde(flatten)]
    pub program: Program,
    pub edition_count: i64,
}

impl From<ProgramSummary> for ProgramSummaryResponse {
    fn from(summary: ProgramSummary) -> Self {
        Self {
            program: summary.program,
            edition_count: summary.edition_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramDetailResponse {
    #[serde(flatten)]
    pub program: Program,
    pub editions: Vec<Edition>,
}

impl From<ProgramDetail> for ProgramDetailResponse {
    fn from(detail: ProgramDetail) -> Self {
        Self {
            program: detail.program,
            editions: detail.editions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDayResponse {
    pub day_number: i32,
    pub exercises: Vec<EditionExercise>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditionPlanResponse {
    pub edition: Edition,
    pub days: Vec<PlanDayResponse>,
    pub total_days: usize,
    pub total_exercises: usize,
}

impl From<EditionPlan> for EditionPlanResponse {
    fn from(plan: EditionPlan) -> Self {
        let total_days = plan.total_days();
        let total_exercises = plan.total_exercises();
        Self {
            edition: plan.edition,
            days: plan
                .days
                .into_iter()
                .map(|d| PlanDayResponse {
                    day_number: d.day_number,
                    exercises: d.exercises,
                })
                .collect(),
            total_days,
            total_exercises,
        }
    }
}
