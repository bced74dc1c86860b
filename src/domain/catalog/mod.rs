//! Catalog module - read-mostly exercise library and workout programs.

mod errors;
mod exercise;
mod program;

pub use errors::CatalogError;
pub use exercise::{Difficulty, Exercise, ExerciseDetail, ExerciseInstruction, MuscleGroup};
pub use program::{
    Edition, EditionExercise, EditionPlan, PlanDay, Program, ProgramDetail, ProgramSummary,
};
