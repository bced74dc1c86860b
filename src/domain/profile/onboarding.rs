//! Questionnaire steps.
//!
//! The Mini App posts one `{step, value}` pair per screen. Each pair is parsed
//! into an [`OnboardingAnswer`] and written to the profile independently, so a
//! step can be repeated any number of times with the same result.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::user_profile::{validate_measurement, ExperienceLevel, FitnessGoal, Gender, Motivation, UserProfile};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Allowed range for planned training days.
pub const MIN_WORKOUT_DAYS: u8 = 1;
pub const MAX_WORKOUT_DAYS: u8 = 7;

/// One parsed questionnaire answer.
#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingAnswer {
    Gender(Gender),
    Experience(ExperienceLevel),
    Goal(FitnessGoal),
    Motivations(Vec<Motivation>),
    WorkoutDays(u8),
    Weight(Decimal),
    Height(Decimal),
}

impl OnboardingAnswer {
    /// Parses the raw step name and JSON value sent by the client.
    pub fn parse(step: &str, value: &Value) -> Result<Self, ValidationError> {
        match step.trim() {
            "gender" => Ok(Self::Gender(text(value, "gender")?.parse()?)),
            "experience" => Ok(Self::Experience(text(value, "experience")?.parse()?)),
            "goal" => Ok(Self::Goal(text(value, "goal")?.parse()?)),
            "motivation" => Ok(Self::Motivations(motivations(value)?)),
            "days" => Ok(Self::WorkoutDays(workout_days(value)?)),
            "weight" => Ok(Self::Weight(validate_measurement("weight", decimal(value, "weight")?)?)),
            "height" => Ok(Self::Height(validate_measurement("height", decimal(value, "height")?)?)),
            other => Err(ValidationError::invalid_format(
                "step",
                format!("unknown onboarding step '{}'", other),
            )),
        }
    }

    /// Writes the answer onto the profile.
    pub fn apply_to(self, profile: &mut UserProfile, now: Timestamp) {
        match self {
            Self::Gender(g) => profile.gender = Some(g),
            Self::Experience(e) => profile.experience_level = Some(e),
            Self::Goal(g) => profile.fitness_goal = Some(g),
            Self::Motivations(m) => profile.set_motivations(m, now),
            Self::WorkoutDays(d) => profile.workout_days_per_week = Some(d),
            Self::Weight(w) => profile.weight = Some(w),
            Self::Height(h) => profile.height = Some(h),
        }
        profile.updated_at = now;
    }
}

/// The whole questionnaire submitted in one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Questionnaire {
    pub gender: Gender,
    pub experience: ExperienceLevel,
    pub goal: FitnessGoal,
    pub motivations: Vec<Motivation>,
    pub workout_days: u8,
    pub weight: Decimal,
    pub height: Decimal,
}

impl Questionnaire {
    /// Validates ranges and rounds measurements.
    pub fn validated(self) -> Result<Self, ValidationError> {
        check_days(i64::from(self.workout_days))?;
        Ok(Self {
            weight: validate_measurement("weight", self.weight)?,
            height: validate_measurement("height", self.height)?,
            ..self
        })
    }

    pub fn answers(self) -> Vec<OnboardingAnswer> {
        vec![
            OnboardingAnswer::Gender(self.gender),
            OnboardingAnswer::Experience(self.experience),
            OnboardingAnswer::Goal(self.goal),
            OnboardingAnswer::Motivations(self.motivations),
            OnboardingAnswer::WorkoutDays(self.workout_days),
            OnboardingAnswer::Weight(self.weight),
            OnboardingAnswer::Height(self.height),
        ]
    }
}

fn text<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ValidationError::empty_field(field))
}

fn motivations(value: &Value) -> Result<Vec<Motivation>, ValidationError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| text(item, "motivation").and_then(Motivation::from_str))
            .collect(),
        Value::String(s) => s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Motivation::from_str)
            .collect(),
        _ => Err(ValidationError::invalid_format(
            "motivation",
            "expected a list of motivations",
        )),
    }
}

fn workout_days(value: &Value) -> Result<u8, ValidationError> {
    let days = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::invalid_format("days", "expected a whole number"))?;
    check_days(days)
}

fn check_days(days: i64) -> Result<u8, ValidationError> {
    if !(i64::from(MIN_WORKOUT_DAYS)..=i64::from(MAX_WORKOUT_DAYS)).contains(&days) {
        return Err(ValidationError::out_of_range(
            "days",
            i64::from(MIN_WORKOUT_DAYS),
            i64::from(MAX_WORKOUT_DAYS),
            days,
        ));
    }
    // Range checked above.
    Ok(days as u8)
}

fn decimal(value: &Value, field: &'static str) -> Result<Decimal, ValidationError> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', "."),
        _ => String::new(),
    };
    Decimal::from_str(&raw)
        .map_err(|_| ValidationError::invalid_format(field, "expected a number"))
}
