//! Exercise library: muscle groups, exercises and step-by-step instructions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ExerciseId, MuscleGroupId, ValidationError};
use crate::domain::profile::Language;

/// How hard an exercise is to perform correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(ValidationError::invalid_format(
                "difficulty",
                format!("unknown difficulty '{}'", other),
            )),
        }
    }
}

/// Picks the Uzbek text when requested and present, the default text otherwise.
fn localized<'a>(default: &'a str, uz: Option<&'a str>, language: Language) -> &'a str {
    match (language, uz) {
        (Language::Uzbek, Some(text)) if !text.trim().is_empty() => text,
        _ => default,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroup {
    pub id: MuscleGroupId,
    pub name: String,
    pub name_uz: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
}

impl MuscleGroup {
    pub fn display_name(&self, language: Language) -> &str {
        localized(&self.name, self.name_uz.as_deref(), language)
    }

    /// Muscle lookups from URLs are case-insensitive.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub name_uz: Option<String>,
    pub muscle_group_id: MuscleGroupId,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub equipment: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl Exercise {
    pub fn display_name(&self, language: Language) -> &str {
        localized(&self.name, self.name_uz.as_deref(), language)
    }
}

/// One numbered instruction step. Step numbers are unique per exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseInstruction {
    pub step_number: i32,
    pub text: String,
    pub text_uz: Option<String>,
}

/// Everything shown on the exercise page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseDetail {
    pub exercise: Exercise,
    pub muscle_group: MuscleGroup,
    pub instructions: Vec<ExerciseInstruction>,
}

impl ExerciseDetail {
    /// Instruction text as display lines: steps in order, each split on line
    /// breaks, trimmed, blanks dropped.
    pub fn instruction_lines(&self, language: Language) -> Vec<String> {
        let mut steps: Vec<&ExerciseInstruction> = self.instructions.iter().collect();
        steps.sort_by_key(|s| s.step_number);
        steps
            .into_iter()
            .flat_map(|step| {
                localized(&step.text, step.text_uz.as_deref(), language)
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
