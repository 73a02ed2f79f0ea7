//! Versioned loader for the persisted progress record.
//!
//! Every stored payload goes through [`load_record`] before the engine sees
//! it. Migrations run sequentially from the stored `schemaVersion` up to
//! [`CURRENT_SCHEMA_VERSION`], then a normalization pass repairs invariants
//! that older or hand-edited records may violate.
//!
//! Records written by the web client carry no `schemaVersion` and are
//! treated as version 0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{UserProgress, DEFAULT_THEME_ID, MILESTONES};
use crate::error::{CoreError, Result};
use crate::storage::PROGRESS_KEY;

/// Current record schema version.
///
/// Increment this when adding a new migration step.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// What to do when the stored payload cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptRecordPolicy {
    /// Start over from defaults. The engine keeps a backup of the raw payload.
    #[default]
    Reset,
    /// Surface [`CoreError::CorruptRecord`] to the caller.
    Fail,
}

/// Where a loaded record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Nothing was stored; defaults were synthesized.
    Fresh,
    /// Stored at the current schema version.
    Stored,
    /// Stored at an older version and migrated.
    Migrated { from: u32 },
    /// Stored payload was unreadable and replaced with defaults.
    Recovered { raw: String, reason: String },
}

/// A record ready for the engine, plus how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    pub progress: UserProgress,
    pub origin: RecordOrigin,
}

impl LoadedRecord {
    /// True when the normalized record differs from what is stored and
    /// should be written back.
    pub fn needs_write(&self) -> bool {
        !matches!(self.origin, RecordOrigin::Stored)
    }
}

/// Decode and normalize a stored payload.
///
/// `raw` is the value under [`PROGRESS_KEY`], or `None` on first run.
///
/// # Errors
///
/// Returns [`CoreError::CorruptRecord`] only when the payload is unreadable
/// and `policy` is [`CorruptRecordPolicy::Fail`].
pub fn load_record(
    raw: Option<&str>,
    policy: CorruptRecordPolicy,
    now: DateTime<Utc>,
) -> Result<LoadedRecord> {
    let Some(raw) = raw else {
        debug!("no stored progress record, starting fresh");
        return Ok(LoadedRecord {
            progress: UserProgress::default(),
            origin: RecordOrigin::Fresh,
        });
    };

    let mut progress = match serde_json::from_str::<UserProgress>(raw) {
        Ok(p) => p,
        Err(e) => {
            return match policy {
                CorruptRecordPolicy::Fail => Err(CoreError::CorruptRecord {
                    key: PROGRESS_KEY.to_string(),
                    message: e.to_string(),
                }),
                CorruptRecordPolicy::Reset => {
                    warn!(error = %e, "stored progress record is corrupt, resetting to defaults");
                    Ok(LoadedRecord {
                        progress: UserProgress::default(),
                        origin: RecordOrigin::Recovered {
                            raw: raw.to_string(),
                            reason: e.to_string(),
                        },
                    })
                }
            };
        }
    };

    let stored_version = progress.schema_version;
    if stored_version > CURRENT_SCHEMA_VERSION {
        warn!(
            stored_version,
            current = CURRENT_SCHEMA_VERSION,
            "progress record written by a newer version, loading known fields only"
        );
    }
    if stored_version < 1 {
        migrate_v1(&mut progress, now);
    }

    let repaired = normalize(&mut progress, now);

    // An invariant repair counts as a migration so the fixed record gets written.
    let origin = if stored_version < CURRENT_SCHEMA_VERSION || repaired {
        RecordOrigin::Migrated {
            from: stored_version,
        }
    } else {
        RecordOrigin::Stored
    };

    Ok(LoadedRecord { progress, origin })
}

/// Migration v1: adopt legacy web records.
///
/// Legacy records lazily gained fields over time; serde defaults already
/// filled the absent ones, so this step only stamps the version.
fn migrate_v1(progress: &mut UserProgress, _now: DateTime<Utc>) {
    progress.schema_version = 1;
}

/// Repair record invariants. Returns true if anything changed.
fn normalize(progress: &mut UserProgress, now: DateTime<Utc>) -> bool {
    let before = progress.clone();

    dedupe(&mut progress.unlocked_themes);
    if !progress.has_theme(DEFAULT_THEME_ID) {
        progress.unlocked_themes.insert(0, DEFAULT_THEME_ID.to_string());
    }
    if !progress.has_theme(&progress.active_theme) {
        progress.active_theme = DEFAULT_THEME_ID.to_string();
    }

    dedupe(&mut progress.unlocked_achievements);
    let fallback_time = progress.last_activity_date.unwrap_or(now);
    for id in &progress.unlocked_achievements {
        progress
            .achievement_unlock_times
            .entry(id.clone())
            .or_insert(fallback_time);
    }

    progress.passed_milestones.retain(|m| MILESTONES.contains(m));
    progress.passed_milestones.sort_unstable();
    progress.passed_milestones.dedup();

    progress.longest_streak = progress.longest_streak.max(progress.current_streak);

    *progress != before
}

fn dedupe<T: PartialEq>(items: &mut Vec<T>) {
    let mut i = 0;
    while i < items.len() {
        if items[..i].contains(&items[i]) {
            items.remove(i);
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_record_is_first_run() {
        let loaded = load_record(None, CorruptRecordPolicy::Fail, now()).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Fresh);
        assert_eq!(loaded.progress, UserProgress::default());
        assert!(loaded.needs_write());
    }

    #[test]
    fn legacy_record_is_migrated_and_defaulted() {
        let raw = r#"{"totalXP": 120, "currentStreak": 2, "unlockedAchievements": ["century"]}"#;
        let loaded = load_record(Some(raw), CorruptRecordPolicy::Fail, now()).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Migrated { from: 0 });
        let p = loaded.progress;
        assert_eq!(p.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(p.total_xp, 120);
        assert_eq!(p.unlocked_themes, vec![DEFAULT_THEME_ID.to_string()]);
        assert_eq!(p.longest_streak, 2);
        assert_eq!(p.achievement_unlock_times.get("century"), Some(&now()));
    }

    #[test]
    fn current_record_loads_as_stored() {
        let raw = serde_json::to_string(&UserProgress::default()).unwrap();
        let loaded = load_record(Some(&raw), CorruptRecordPolicy::Fail, now()).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Stored);
        assert!(!loaded.needs_write());
    }

    #[test]
    fn normalize_repairs_theme_invariants() {
        let raw = r#"{"schemaVersion": 1, "unlockedThemes": ["zen", "zen"], "activeTheme": "ocean"}"#;
        let p = load_record(Some(raw), CorruptRecordPolicy::Fail, now())
            .unwrap()
            .progress;
        assert_eq!(p.unlocked_themes, vec!["default".to_string(), "zen".to_string()]);
        assert_eq!(p.active_theme, DEFAULT_THEME_ID);
    }

    #[test]
    fn normalize_filters_unknown_milestones() {
        let raw = r#"{"schemaVersion": 1, "passedMilestones": [100, 50, 77, 50]}"#;
        let p = load_record(Some(raw), CorruptRecordPolicy::Fail, now())
            .unwrap()
            .progress;
        assert_eq!(p.passed_milestones, vec![50, 100]);
    }

    #[test]
    fn corrupt_record_resets_under_reset_policy() {
        let loaded = load_record(Some("{not json"), CorruptRecordPolicy::Reset, now()).unwrap();
        assert!(matches!(loaded.origin, RecordOrigin::Recovered { ref raw, .. } if raw == "{not json"));
        assert_eq!(loaded.progress, UserProgress::default());
    }

    #[test]
    fn corrupt_record_fails_under_fail_policy() {
        let err = load_record(Some("42"), CorruptRecordPolicy::Fail, now()).unwrap_err();
        assert!(matches!(err, CoreError::CorruptRecord { .. }));
    }
}
