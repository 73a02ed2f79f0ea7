//! Scoring for the inbound "challenge progress" signal.
//!
//! Page logic reports how a practice challenge went; the engine turns that
//! report into an XP award.

use serde::{Deserialize, Serialize};

/// Source label recorded in history for challenge awards.
pub const CHALLENGE_SOURCE: &str = "challenge";

/// Minutes of practice beyond this earn nothing extra.
pub const MAX_COUNTED_MINUTES: f64 = 300.0;

/// Minutes per point of time-based XP.
pub const MINUTES_PER_POINT: f64 = 5.0;

/// Points for making progress in a session.
pub const PROGRESS_BONUS: f64 = 2.0;

/// Cap on a single challenge award.
pub const MAX_CHALLENGE_XP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    /// Minutes spent; negative values count as zero.
    pub time_spent: f64,
    #[serde(default)]
    pub progress_increased: bool,
    #[serde(default)]
    pub completed: bool,
}

/// XP earned for a challenge report.
///
/// The base score is rounded before the streak multiplier applies, and the
/// result is capped at one point: a report that scores anything earns 1 XP,
/// a report that rounds to zero earns nothing.
pub fn challenge_xp(report: &ChallengeProgress, multiplier: f64, completion_bonus: u64) -> u64 {
    let minutes = if report.time_spent.is_finite() {
        report.time_spent.clamp(0.0, MAX_COUNTED_MINUTES)
    } else {
        0.0
    };

    let mut base = minutes / MINUTES_PER_POINT;
    if report.progress_increased {
        base += PROGRESS_BONUS;
    }
    if report.completed {
        base += completion_bonus as f64;
    }

    let scaled = base.round() * multiplier;
    scaled.clamp(0.0, MAX_CHALLENGE_XP) as u64
}
