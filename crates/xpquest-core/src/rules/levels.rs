//! Level ladder derived from total XP.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    pub level: u8,
    pub name: &'static str,
    pub min_xp: u64,
    pub description: &'static str,
}

/// Ascending by `min_xp`; the first entry starts at zero.
pub static LEVELS: [Level; 7] = [
    Level {
        level: 1,
        name: "Beginner",
        min_xp: 0,
        description: "Just getting started",
    },
    Level {
        level: 2,
        name: "Apprentice",
        min_xp: 100,
        description: "Building the habit",
    },
    Level {
        level: 3,
        name: "Learner",
        min_xp: 250,
        description: "Showing up regularly",
    },
    Level {
        level: 4,
        name: "Scholar",
        min_xp: 500,
        description: "Knowledge is compounding",
    },
    Level {
        level: 5,
        name: "Expert",
        min_xp: 1000,
        description: "Deep in the practice",
    },
    Level {
        level: 6,
        name: "Legend",
        min_xp: 2500,
        description: "Few get this far",
    },
    Level {
        level: 7,
        name: "Grandmaster",
        min_xp: 5000,
        description: "Mastery achieved",
    },
];

/// Highest level whose threshold is at or below `xp`.
pub fn level_for_xp(xp: u64) -> &'static Level {
    LEVELS
        .iter()
        .rev()
        .find(|l| l.min_xp <= xp)
        .unwrap_or(&LEVELS[0])
}

/// The level after the one `xp` sits in, if any.
pub fn next_level(xp: u64) -> Option<&'static Level> {
    LEVELS.iter().find(|l| l.min_xp > xp)
}

/// 0.0 .. 1.0 progress from the current level to the next.
pub fn level_progress(xp: u64) -> f64 {
    let current = level_for_xp(xp);
    match next_level(xp) {
        Some(next) => {
            let span = (next.min_xp - current.min_xp) as f64;
            (xp - current.min_xp) as f64 / span
        }
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_ascending_from_zero() {
        assert_eq!(LEVELS[0].min_xp, 0);
        assert!(LEVELS.windows(2).all(|w| w[0].min_xp < w[1].min_xp));
    }

    #[test]
    fn picks_highest_reached_level() {
        assert_eq!(level_for_xp(0).name, "Beginner");
        assert_eq!(level_for_xp(49).name, "Beginner");
        assert_eq!(level_for_xp(100).name, "Apprentice");
        assert_eq!(level_for_xp(2600).name, "Legend");
        assert_eq!(level_for_xp(2600).min_xp, 2500);
        assert_eq!(level_for_xp(u64::MAX).name, "Grandmaster");
    }

    #[test]
    fn progress_between_levels() {
        assert_eq!(level_progress(0), 0.0);
        assert_eq!(level_progress(50), 0.5);
        assert_eq!(level_progress(9000), 1.0);
        assert!(next_level(9000).is_none());
    }
}
