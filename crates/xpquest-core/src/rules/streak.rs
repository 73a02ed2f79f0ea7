//! Daily activity streaks.
//!
//! A streak counts consecutive local calendar days with at least one
//! accepted XP award. Day identity is the local date, not a rolling 24 hour
//! window: activity at 23:59 and again at 00:01 spans two days.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::progress::UserProgress;

/// How a streak update changed the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// Activity was already counted today.
    Unchanged,
    /// Last activity was yesterday.
    Extended,
    /// First activity ever, or a gap of more than one day.
    Restarted,
}

fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// Update the streak for activity happening at `now`.
///
/// Idempotent within a local calendar day.
pub fn update_streak(progress: &mut UserProgress, now: DateTime<Utc>) -> StreakChange {
    let today = local_date(now);
    let last = progress.last_activity_date.map(local_date);

    let change = match last {
        Some(last) if last == today => return StreakChange::Unchanged,
        Some(last) if today.pred_opt() == Some(last) => {
            progress.current_streak = progress.current_streak.saturating_add(1);
            StreakChange::Extended
        }
        _ => {
            progress.current_streak = 1;
            StreakChange::Restarted
        }
    };

    progress.longest_streak = progress.longest_streak.max(progress.current_streak);
    progress.last_activity_date = Some(now);
    change
}

/// XP multiplier earned by a streak length.
pub fn streak_multiplier(streak: u32) -> f64 {
    match streak {
        7.. => 1.5,
        5..=6 => 1.3,
        3..=4 => 1.1,
        _ => 1.0,
    }
}
