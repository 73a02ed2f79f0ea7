//! Pure game rules applied to a [`UserProgress`](crate::progress::UserProgress).
//!
//! Nothing here persists or publishes; the engine composes these functions
//! inside its commit sequence.

mod achievements;
mod levels;
mod milestones;
mod streak;

pub use achievements::{check_achievements, find_achievement, Achievement, Requirement, ACHIEVEMENTS};
pub use levels::{level_for_xp, level_progress, next_level, Level, LEVELS};
pub use milestones::check_milestones;
pub use streak::{streak_multiplier, update_streak, StreakChange};
