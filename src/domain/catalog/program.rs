//! Workout programs, their editions and the per-day exercise plan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{EditionId, ExerciseId, ProgramId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// A versioned run of a program (e.g. "Beginner, 4 weeks").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    pub id: EditionId,
    pub program_id: ProgramId,
    pub title: String,
    pub display_order: i32,
    pub duration_weeks: i32,
    pub days_per_week: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// One exercise slot in an edition's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionExercise {
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub thumbnail_url: Option<String>,
    pub sets: i32,
    pub reps: Option<i32>,
    pub minutes: Option<i32>,
    pub day_number: i32,
}

/// List entry for the programs screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSummary {
    pub program: Program,
    pub edition_count: i64,
}

/// Program page: the program and its editions in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDetail {
    pub program: Program,
    pub editions: Vec<Edition>,
}

impl ProgramDetail {
    pub fn new(program: Program, mut editions: Vec<Edition>) -> Self {
        editions.sort_by_key(|e| (e.display_order, e.id));
        Self { program, editions }
    }
}

/// Exercises scheduled for one training day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDay {
    pub day_number: i32,
    pub exercises: Vec<EditionExercise>,
}

/// Edition page: the edition and its exercises grouped by day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionPlan {
    pub edition: Edition,
    pub days: Vec<PlanDay>,
}

impl EditionPlan {
    /// Groups exercises by day number, days ascending, insertion order kept within a day.
    pub fn new(edition: Edition, exercises: Vec<EditionExercise>) -> Self {
        let mut by_day: BTreeMap<i32, Vec<EditionExercise>> = BTreeMap::new();
        for exercise in exercises {
            by_day.entry(exercise.day_number).or_default().push(exercise);
        }
        let days = by_day
            .into_iter()
            .map(|(day_number, exercises)| PlanDay { day_number, exercises })
            .collect();
        Self { edition, days }
    }

    pub fn total_days(&self) -> usize {
        self.days.len()
    }

    pub fn total_exercises(&self) -> usize {
        self.days.iter().map(|d| d.exercises.len()).sum()
    }

    pub fn has_day(&self, day_number: i32) -> bool {
        self.days.iter().any(|d| d.day_number == day_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edition(id: i64, order: i32) -> Edition {
        Edition {
            id: EditionId::new(id),
            program_id: ProgramId::new(1),
            title: format!("Edition {}", id),
            display_order: order,
            duration_weeks: 4,
            days_per_week: 3,
            description: None,
            image_url: None,
        }
    }

    fn slot(exercise: i64, day: i32) -> EditionExercise {
        EditionExercise {
            exercise_id: ExerciseId::new(exercise),
            exercise_name: format!("Exercise {}", exercise),
            thumbnail_url: None,
            sets: 3,
            reps: Some(12),
            minutes: None,
            day_number: day,
        }
    }

    #[test]
    fn program_detail_orders_editions() {
        let program = Program {
            id: ProgramId::new(1),
            title: "Strength".into(),
            description: None,
            image_url: None,
            is_active: true,
        };
        let detail = ProgramDetail::new(program, vec![edition(2, 2), edition(1, 1)]);
        let ids: Vec<i64> = detail.editions.iter().map(|e| e.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn plan_groups_by_day_and_counts() {
        let plan = EditionPlan::new(
            edition(1, 1),
            vec![slot(1, 2), slot(2, 1), slot(3, 2), slot(4, 3)],
        );
        assert_eq!(plan.total_days(), 3);
        assert_eq!(plan.total_exercises(), 4);
        assert_eq!(plan.days[0].day_number, 1);
        let day_two: Vec<i64> = plan.days[1].exercises.iter().map(|e| e.exercise_id.as_i64()).collect();
        assert_eq!(day_two, vec![1, 3]);
        assert!(plan.has_day(3));
        assert!(!plan.has_day(4));
    }
}
