//! UserProfile entity and its questionnaire enums.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{TelegramId, Timestamp, UserId, ValidationError};

/// Name given to profiles created before the user tells us theirs.
pub const DEFAULT_PROFILE_NAME: &str = "User";

/// Largest value a one-decimal measurement column can hold.
const MAX_MEASUREMENT: Decimal = Decimal::from_parts(99999, 0, 0, false, 1);

const MAX_NAME_LEN: usize = 100;

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::invalid_format(
                        $field,
                        format!("unknown value '{}'", other),
                    )),
                }
            }
        }
    };
}

choice_enum!(
    /// Self-reported gender.
    Gender, "gender" {
        Male => "male",
        Female => "female",
    }
);

choice_enum!(
    /// Training experience.
    ExperienceLevel, "experience_level" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
);

choice_enum!(
    /// Primary fitness goal picked in the questionnaire.
    FitnessGoal, "fitness_goal" {
        BuildBody => "build_body",
        LoseWeight => "lose_weight",
        GainMuscle => "gain_muscle",
        GetShape => "get_shape",
    }
);

choice_enum!(
    /// Reasons a user trains. A profile holds a set of these.
    Motivation, "motivation" {
        HealthyLifestyle => "healthy_lifestyle",
        ImprovePhysique => "improve_physique",
        GetStronger => "get_stronger",
        GoodChallenge => "good_challenge",
    }
);

choice_enum!(
    /// Display units for weight and height. Stored values are always metric.
    UnitSystem, "unit_system" {
        Metric => "metric",
        English => "english",
    }
);

choice_enum!(
    /// Interface language.
    Language, "language" {
        Uzbek => "uz",
        English => "en",
        Russian => "ru",
    }
);

impl Default for UnitSystem {
    fn default() -> Self {
        UnitSystem::Metric
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Uzbek
    }
}

/// A fitness profile, one per Telegram account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub telegram_id: TelegramId,
    pub telegram_username: Option<String>,
    pub is_premium: bool,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    /// Kilograms, one decimal place.
    pub weight: Option<Decimal>,
    /// Centimetres, one decimal place.
    pub height: Option<Decimal>,
    pub experience_level: Option<ExperienceLevel>,
    pub fitness_goal: Option<FitnessGoal>,
    pub workout_days_per_week: Option<u8>,
    pub unit_system: UnitSystem,
    pub language: Language,
    pub motivations: Vec<Motivation>,
    pub onboarding_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data needed to insert a fresh profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    pub telegram_id: TelegramId,
    pub telegram_username: Option<String>,
    pub name: String,
    pub is_premium: bool,
}

impl NewUserProfile {
    /// Builds insert data, falling back to the default name for blank input.
    pub fn new(
        telegram_id: TelegramId,
        telegram_username: Option<String>,
        name: Option<String>,
    ) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
        Self {
            telegram_id,
            telegram_username: telegram_username.filter(|u| !u.trim().is_empty()),
            name,
            is_premium: false,
        }
    }

    pub fn with_premium(mut self, is_premium: bool) -> Self {
        self.is_premium = is_premium;
        self
    }

    /// Materializes the profile once storage has assigned an id.
    pub fn into_profile(self, id: UserId, now: Timestamp) -> UserProfile {
        UserProfile {
            id,
            telegram_id: self.telegram_id,
            telegram_username: self.telegram_username,
            is_premium: self.is_premium,
            name: self.name,
            gender: None,
            birth_date: None,
            weight: None,
            height: None,
            experience_level: None,
            fitness_goal: None,
            workout_days_per_week: None,
            unit_system: UnitSystem::default(),
            language: Language::default(),
            motivations: Vec::new(),
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional field changes from the profile edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub weight: Option<Decimal>,
    pub height: Option<Decimal>,
    pub unit_system: Option<UnitSystem>,
}

impl UserProfile {
    /// Whole years since `birth_date` as of `today`.
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        let mut years = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Body mass index rounded to one decimal, when both measurements exist.
    pub fn bmi(&self) -> Option<Decimal> {
        let weight = self.weight?;
        let height_m = self.height? / Decimal::ONE_HUNDRED;
        if height_m.is_zero() {
            return None;
        }
        let bmi = weight / (height_m * height_m);
        Some(bmi.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Updates Telegram-side identity fields seen on a fresh login.
    pub fn refresh_telegram_identity(
        &mut self,
        username: Option<String>,
        is_premium: Option<bool>,
        now: Timestamp,
    ) -> bool {
        let mut changed = false;
        let username = username.filter(|u| !u.trim().is_empty());
        if username.is_some() && username != self.telegram_username {
            self.telegram_username = username;
            changed = true;
        }
        if let Some(premium) = is_premium {
            if premium != self.is_premium {
                self.is_premium = premium;
                changed = true;
            }
        }
        if changed {
            self.updated_at = now;
        }
        changed
    }

    /// Applies a validated edit form. Nothing is written if any field is invalid.
    pub fn apply_changes(
        &mut self,
        changes: ProfileChanges,
        today: NaiveDate,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        let name = changes.name.map(|n| validate_name(&n)).transpose()?;
        if let Some(birth) = changes.birth_date {
            validate_birth_date(birth, today)?;
        }
        let weight = changes.weight.map(|w| validate_measurement("weight", w)).transpose()?;
        let height = changes.height.map(|h| validate_measurement("height", h)).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(gender) = changes.gender {
            self.gender = Some(gender);
        }
        if let Some(birth) = changes.birth_date {
            self.birth_date = Some(birth);
        }
        if weight.is_some() {
            self.weight = weight;
        }
        if height.is_some() {
            self.height = height;
        }
        if let Some(unit) = changes.unit_system {
            self.unit_system = unit;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn set_language(&mut self, language: Language, now: Timestamp) {
        self.language = language;
        self.updated_at = now;
    }

    /// Replaces the motivation set, dropping duplicates while keeping order.
    pub fn set_motivations(&mut self, motivations: Vec<Motivation>, now: Timestamp) {
        let mut unique = Vec::with_capacity(motivations.len());
        for m in motivations {
            if !unique.contains(&m) {
                unique.push(m);
            }
        }
        self.motivations = unique;
        self.updated_at = now;
    }

    pub fn complete_onboarding(&mut self, now: Timestamp) {
        self.onboarding_completed = true;
        self.updated_at = now;
    }

    /// True once any questionnaire answer has been stored.
    pub fn has_onboarding_answers(&self) -> bool {
        self.gender.is_some()
            || self.experience_level.is_some()
            || self.fitness_goal.is_some()
            || self.workout_days_per_week.is_some()
            || self.weight.is_some()
            || self.height.is_some()
            || !self.motivations.is_empty()
    }

    /// Where the Mini App should send this user after login.
    pub fn landing_path(&self) -> &'static str {
        if self.onboarding_completed {
            "/workouts/"
        } else {
            "/miniapp/questionnaire/"
        }
    }
}

pub(crate) fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::out_of_range(
            "name",
            1,
            MAX_NAME_LEN as i64,
            name.chars().count() as i64,
        ));
    }
    Ok(name.to_string())
}

fn validate_birth_date(birth: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if birth > today {
        return Err(ValidationError::invalid_format(
            "birth_date",
            "cannot be in the future",
        ));
    }
    if today.year() - birth.year() > 120 {
        return Err(ValidationError::invalid_format("birth_date", "is too far in the past"));
    }
    Ok(())
}

/// Checks a weight or height and rounds it to the stored precision.
pub(crate) fn validate_measurement(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::invalid_format(field, "must be greater than zero"));
    }
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if rounded > MAX_MEASUREMENT {
        return Err(ValidationError::invalid_format(field, "is too large"));
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile() -> UserProfile {
        NewUserProfile::new(TelegramId::new(1001).unwrap(), Some("lifter".into()), None)
            .into_profile(UserId::new(1), Timestamp::now())
    }

    #[test]
    fn new_profile_defaults_name_language_and_units() {
        let p = profile();
        assert_eq!(p.name, DEFAULT_PROFILE_NAME);
        assert_eq!(p.language, Language::Uzbek);
        assert_eq!(p.unit_system, UnitSystem::Metric);
        assert!(!p.onboarding_completed);
        assert_eq!(p.landing_path(), "/miniapp/questionnaire/");
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let p = NewUserProfile::new(TelegramId::new(5).unwrap(), Some(" ".into()), Some("  ".into()));
        assert_eq!(p.name, DEFAULT_PROFILE_NAME);
        assert_eq!(p.telegram_username, None);
    }

    #[test]
    fn choice_enums_parse_case_insensitively() {
        assert_eq!(Gender::from_str("Female").unwrap(), Gender::Female);
        assert_eq!(FitnessGoal::from_str("lose_weight").unwrap(), FitnessGoal::LoseWeight);
        assert_eq!(Language::from_str("RU").unwrap(), Language::Russian);
        assert!(ExperienceLevel::from_str("expert").is_err());
    }

    #[test]
    fn age_accounts_for_birthday_not_yet_reached() {
        let mut p = profile();
        p.birth_date = Some(date(1990, 6, 15));
        assert_eq!(p.age(date(2024, 6, 14)), Some(33));
        assert_eq!(p.age(date(2024, 6, 15)), Some(34));
    }

    #[test]
    fn bmi_rounds_to_one_decimal() {
        let mut p = profile();
        p.weight = Some(Decimal::from_str("70.0").unwrap());
        p.height = Some(Decimal::from_str("175.0").unwrap());
        assert_eq!(p.bmi(), Some(Decimal::from_str("22.9").unwrap()));
    }

    #[test]
    fn bmi_missing_without_both_measurements() {
        let mut p = profile();
        p.weight = Some(Decimal::from(80));
        assert_eq!(p.bmi(), None);
    }

    #[test]
    fn apply_changes_rejects_invalid_weight_without_partial_write() {
        let mut p = profile();
        let changes = ProfileChanges {
            name: Some("Aziz".into()),
            weight: Some(Decimal::from(-3)),
            ..Default::default()
        };
        assert!(p.apply_changes(changes, date(2024, 1, 1), Timestamp::now()).is_err());
        assert_eq!(p.name, DEFAULT_PROFILE_NAME);
    }

    #[test]
    fn apply_changes_rejects_future_birth_date() {
        let mut p = profile();
        let changes = ProfileChanges {
            birth_date: Some(date(2030, 1, 1)),
            ..Default::default()
        };
        assert!(p.apply_changes(changes, date(2024, 1, 1), Timestamp::now()).is_err());
    }

    #[test]
    fn apply_changes_rounds_measurements() {
        let mut p = profile();
        let changes = ProfileChanges {
            height: Some(Decimal::from_str("180.26").unwrap()),
            unit_system: Some(UnitSystem::English),
            ..Default::default()
        };
        p.apply_changes(changes, date(2024, 1, 1), Timestamp::now()).unwrap();
        assert_eq!(p.height, Some(Decimal::from_str("180.3").unwrap()));
        assert_eq!(p.unit_system, UnitSystem::English);
    }

    #[test]
    fn set_motivations_drops_duplicates() {
        let mut p = profile();
        p.set_motivations(
            vec![Motivation::GetStronger, Motivation::GetStronger, Motivation::GoodChallenge],
            Timestamp::now(),
        );
        assert_eq!(p.motivations, vec![Motivation::GetStronger, Motivation::GoodChallenge]);
    }

    #[test]
    fn refresh_identity_reports_changes_only() {
        let mut p = profile();
        assert!(!p.refresh_telegram_identity(Some("lifter".into()), Some(false), Timestamp::now()));
        assert!(p.refresh_telegram_identity(None, Some(true), Timestamp::now()));
        assert!(p.is_premium);
    }

    #[test]
    fn completed_profile_lands_on_workouts() {
        let mut p = profile();
        p.complete_onboarding(Timestamp::now());
        assert_eq!(p.landing_path(), "/workouts/");
    }
}
