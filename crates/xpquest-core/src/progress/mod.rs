//! The persisted progress record.
//!
//! [`UserProgress`] is the single value the engine reads, mutates and writes
//! back. Field names on the wire match the record the web client stores, so
//! existing browser exports load unchanged.

mod schema;

pub use schema::{
    load_record, CorruptRecordPolicy, LoadedRecord, RecordOrigin, CURRENT_SCHEMA_VERSION,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme every record owns from the start.
pub const DEFAULT_THEME_ID: &str = "default";

/// Total-XP thresholds that trigger a one-time celebration.
pub const MILESTONES: [u64; 7] = [50, 100, 250, 500, 1000, 2500, 5000];

/// One accepted XP award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpEntry {
    pub amount: u64,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// The single persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(rename = "totalXP", default)]
    pub total_xp: u64,
    #[serde(default = "default_unlocked_themes")]
    pub unlocked_themes: Vec<String>,
    #[serde(default = "default_active_theme")]
    pub active_theme: String,
    #[serde(default)]
    pub xp_history: Vec<XpEntry>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_activity_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unlocked_achievements: Vec<String>,
    #[serde(default)]
    pub achievement_unlock_times: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    pub passed_milestones: Vec<u64>,
}

fn default_unlocked_themes() -> Vec<String> {
    vec![DEFAULT_THEME_ID.to_string()]
}

fn default_active_theme() -> String {
    DEFAULT_THEME_ID.to_string()
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            total_xp: 0,
            unlocked_themes: default_unlocked_themes(),
            active_theme: default_active_theme(),
            xp_history: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            unlocked_achievements: Vec::new(),
            achievement_unlock_times: BTreeMap::new(),
            passed_milestones: Vec::new(),
        }
    }
}

impl UserProgress {
    pub fn has_theme(&self, theme_id: &str) -> bool {
        self.unlocked_themes.iter().any(|t| t == theme_id)
    }

    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.unlocked_achievements.iter().any(|a| a == achievement_id)
    }

    pub fn has_passed(&self, milestone: u64) -> bool {
        self.passed_milestones.contains(&milestone)
    }

    /// Themes owned beyond the default one.
    pub fn extra_theme_count(&self) -> usize {
        self.unlocked_themes
            .iter()
            .filter(|t| t.as_str() != DEFAULT_THEME_ID)
            .count()
    }

    /// Timestamp of the newest history entry, if any.
    pub fn last_award_at(&self) -> Option<DateTime<Utc>> {
        self.xp_history.iter().map(|e| e.timestamp).max()
    }

    /// The next milestone not yet passed.
    pub fn next_milestone(&self) -> Option<u64> {
        MILESTONES.iter().copied().find(|m| !self.has_passed(*m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_owns_default_theme() {
        let p = UserProgress::default();
        assert!(p.has_theme(DEFAULT_THEME_ID));
        assert_eq!(p.active_theme, DEFAULT_THEME_ID);
        assert_eq!(p.extra_theme_count(), 0);
        assert_eq!(p.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn serializes_with_web_field_names() {
        let json = serde_json::to_value(UserProgress::default()).unwrap();
        assert!(json.get("totalXP").is_some());
        assert!(json.get("unlockedThemes").is_some());
        assert!(json.get("achievementUnlockTimes").is_some());
        assert!(json.get("passedMilestones").is_some());
    }

    #[test]
    fn next_milestone_skips_passed() {
        let mut p = UserProgress::default();
        assert_eq!(p.next_milestone(), Some(50));
        p.passed_milestones = vec![50, 100];
        assert_eq!(p.next_milestone(), Some(250));
    }
}
