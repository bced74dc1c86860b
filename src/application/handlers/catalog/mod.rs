//! Catalog handlers - read side for muscle groups, exercises and programs.

mod get_edition_plan;
mod get_exercise_detail;
mod get_program;
mod list_exercises;
mod list_muscle_groups;
mod list_programs;

pub use get_edition_plan::{GetEditionPlanHandler, GetEditionPlanQuery};
pub use get_exercise_detail::{ExerciseView, GetExerciseDetailHandler, GetExerciseDetailQuery};
pub use get_program::{GetProgramHandler, GetProgramQuery};
pub use list_exercises::{ExerciseListItem, ListExercisesHandler, ListExercisesQuery};
pub use list_muscle_groups::ListMuscleGroupsHandler;
pub use list_programs::ListProgramsHandler;
