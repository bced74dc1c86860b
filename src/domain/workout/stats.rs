//! Progress statistics over completed workouts.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

use super::session::{WorkoutSession, WorkoutStatus};

/// How far back the streak walk looks.
pub const MAX_STREAK_LOOKBACK_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerStats {
    pub total_workouts: i64,
    pub total_duration_hours: Decimal,
    pub total_calories: i64,
    pub current_streak: u32,
}

impl TrainerStats {
    /// Aggregates over `sessions`, ignoring anything not completed.
    pub fn from_sessions(sessions: &[WorkoutSession], today: NaiveDate) -> Self {
        let completed: Vec<&WorkoutSession> = sessions
            .iter()
            .filter(|s| s.status == WorkoutStatus::Completed)
            .collect();

        let total_seconds: i64 = completed
            .iter()
            .map(|s| i64::from(s.metrics.duration_seconds))
            .sum();
        let total_calories: Decimal = completed.iter().map(|s| s.metrics.total_calories).sum();
        let days: HashSet<NaiveDate> = completed
            .iter()
            .filter_map(|s| s.completed_at.map(|t| t.date()))
            .collect();

        Self {
            total_workouts: completed.len() as i64,
            total_duration_hours: (Decimal::from(total_seconds) / Decimal::from(3600))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
            total_calories: total_calories
                .round_dp_with_strategy(0, RoundingStrategy::ToZero)
                .try_into()
                .unwrap_or(i64::MAX),
            current_streak: current_streak(&days, today),
        }
    }
}

/// Consecutive training days ending today.
///
/// A missing today does not break the streak, since the user may still train
/// later in the day. Any other gap ends it.
pub fn current_streak(training_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    for offset in 0..MAX_STREAK_LOOKBACK_DAYS {
        if training_days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EditionId, Timestamp, UserId, WorkoutSessionId};
    use crate::domain::workout::{NewWorkoutSession, WorkoutMetrics};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn days(list: &[NaiveDate]) -> HashSet<NaiveDate> {
        list.iter().copied().collect()
    }

    #[test]
    fn streak_counts_back_from_today() {
        let today = d(2024, 5, 10);
        let set = days(&[d(2024, 5, 10), d(2024, 5, 9), d(2024, 5, 8), d(2024, 5, 6)]);
        assert_eq!(current_streak(&set, today), 3);
    }

    #[test]
    fn missing_today_does_not_break_streak() {
        let today = d(2024, 5, 10);
        let set = days(&[d(2024, 5, 9), d(2024, 5, 8)]);
        assert_eq!(current_streak(&set, today), 2);
    }

    #[test]
    fn gap_yesterday_means_no_streak() {
        let today = d(2024, 5, 10);
        let set = days(&[d(2024, 5, 8), d(2024, 5, 7)]);
        assert_eq!(current_streak(&set, today), 0);
    }

    #[test]
    fn stats_ignore_unfinished_sessions() {
        let completed_at = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap());
        let mut done = NewWorkoutSession {
            user_id: UserId::new(1),
            edition_id: EditionId::new(1),
            day_number: 1,
            started_at: completed_at,
        }
        .into_session(WorkoutSessionId::new(1));
        done.complete(
            WorkoutMetrics {
                duration_seconds: 5400,
                exercises_completed: 5,
                total_reps: 100,
                total_weight: Decimal::ZERO,
                total_calories: Decimal::new(4505, 1),
            },
            completed_at,
        )
        .unwrap();
        let open = NewWorkoutSession {
            user_id: UserId::new(1),
            edition_id: EditionId::new(1),
            day_number: 2,
            started_at: completed_at,
        }
        .into_session(WorkoutSessionId::new(2));

        let stats = TrainerStats::from_sessions(&[done, open], d(2024, 5, 10));
        assert_eq!(stats.total_workouts, 1);
        assert_eq!(stats.total_duration_hours, Decimal::new(15, 1));
        assert_eq!(stats.total_calories, 450);
        assert_eq!(stats.current_streak, 1);
    }

    proptest! {
        #[test]
        fn streak_of_consecutive_days_equals_run_length(run in 1u32..60, skip_today in any::<bool>()) {
            let today = d(2024, 12, 31);
            let start = if skip_today { 1 } else { 0 };
            let set: HashSet<NaiveDate> = (start..start + run)
                .map(|i| today - Duration::days(i64::from(i)))
                .collect();
            prop_assert_eq!(current_streak(&set, today), run);
        }
    }
}
