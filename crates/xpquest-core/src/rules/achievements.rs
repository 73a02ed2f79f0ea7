//! One-time achievement badges.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::progress::UserProgress;

/// The single condition gating an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "threshold", rename_all = "snake_case")]
pub enum Requirement {
    /// Total XP at least this much.
    Xp(u64),
    /// Current streak at least this many days.
    Streak(u32),
    /// Themes owned beyond the default at least this many.
    Themes(usize),
}

impl Requirement {
    pub fn is_met(&self, progress: &UserProgress) -> bool {
        match *self {
            Requirement::Xp(min) => progress.total_xp >= min,
            Requirement::Streak(min) => progress.current_streak >= min,
            Requirement::Themes(min) => progress.extra_theme_count() >= min,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
}

pub static ACHIEVEMENTS: [Achievement; 7] = [
    Achievement {
        id: "first_steps",
        name: "First Steps",
        description: "Earn your first 10 XP",
        requirement: Requirement::Xp(10),
    },
    Achievement {
        id: "century",
        name: "Century",
        description: "Reach 100 XP",
        requirement: Requirement::Xp(100),
    },
    Achievement {
        id: "dedicated",
        name: "Dedicated Learner",
        description: "Reach 500 XP",
        requirement: Requirement::Xp(500),
    },
    Achievement {
        id: "xp_master",
        name: "XP Master",
        description: "Reach 1000 XP",
        requirement: Requirement::Xp(1000),
    },
    Achievement {
        id: "on_fire",
        name: "On Fire",
        description: "Keep a 3 day streak",
        requirement: Requirement::Streak(3),
    },
    Achievement {
        id: "unstoppable",
        name: "Unstoppable",
        description: "Keep a 7 day streak",
        requirement: Requirement::Streak(7),
    },
    Achievement {
        id: "collector",
        name: "Theme Collector",
        description: "Unlock your first theme",
        requirement: Requirement::Themes(1),
    },
];

pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Unlock every achievement whose requirement now holds.
///
/// Returns only the achievements unlocked by this call; repeated calls
/// never return an id twice.
pub fn check_achievements(
    progress: &mut UserProgress,
    now: DateTime<Utc>,
) -> Vec<&'static Achievement> {
    let newly: Vec<&'static Achievement> = ACHIEVEMENTS
        .iter()
        .filter(|a| !progress.has_achievement(a.id) && a.requirement.is_met(progress))
        .collect();

    for achievement in &newly {
        progress.unlocked_achievements.push(achievement.id.to_string());
        progress
            .achievement_unlock_times
            .insert(achievement.id.to_string(), now);
    }
    newly
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn ids(list: &[&Achievement]) -> Vec<&'static str> {
        list.iter().map(|a| a.id).collect()
    }

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            assert!(ACHIEVEMENTS[i + 1..].iter().all(|b| b.id != a.id));
        }
    }

    #[test]
    fn xp_threshold_unlocks_all_qualifying_at_once() {
        let mut p = UserProgress {
            total_xp: 150,
            ..Default::default()
        };
        let newly = check_achievements(&mut p, now());
        assert_eq!(ids(&newly), vec!["first_steps", "century"]);
        assert_eq!(p.achievement_unlock_times.len(), 2);
    }

    #[test]
    fn repeated_checks_do_not_retrigger() {
        let mut p = UserProgress {
            total_xp: 150,
            ..Default::default()
        };
        check_achievements(&mut p, now());
        assert!(check_achievements(&mut p, now()).is_empty());
        assert_eq!(p.unlocked_achievements.len(), 2);
    }

    #[test]
    fn theme_count_excludes_default() {
        let mut p = UserProgress::default();
        assert!(check_achievements(&mut p, now()).is_empty());
        p.unlocked_themes.push("zen".into());
        assert_eq!(ids(&check_achievements(&mut p, now())), vec!["collector"]);
    }

    #[test]
    fn streak_requirement() {
        let mut p = UserProgress {
            current_streak: 7,
            ..Default::default()
        };
        assert_eq!(
            ids(&check_achievements(&mut p, now())),
            vec!["on_fire", "unstoppable"]
        );
    }

    #[test]
    fn unlock_time_is_kept_from_first_unlock() {
        let mut p = UserProgress {
            total_xp: 10,
            ..Default::default()
        };
        check_achievements(&mut p, now());
        let later = now() + chrono::Duration::days(1);
        p.total_xp = 100;
        check_achievements(&mut p, later);
        assert_eq!(p.achievement_unlock_times["first_steps"], now());
        assert_eq!(p.achievement_unlock_times["century"], later);
    }
}
