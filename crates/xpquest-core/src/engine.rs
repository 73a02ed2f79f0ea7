//! The XP engine.
//!
//! [`GameSystem`] owns the progress record, the store it persists to and the
//! event bus it announces changes on. Every mutating call follows the same
//! sequence: clone the record, apply rules to the clone, persist it, swap it
//! in, then publish. If persisting fails the in-memory record is untouched
//! and nothing is published.
//!
//! ## Usage
//!
//! ```ignore
//! let mut bus = EventBus::new();
//! bus.subscribe(|event| println!("{}", event.name()));
//! let mut game = GameSystem::open(SqliteStore::open()?, EngineOptions::default(), bus)?;
//! game.award_xp(10, "lesson")?;
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::challenge::{challenge_xp, ChallengeProgress, CHALLENGE_SOURCE};
use crate::error::Result;
use crate::events::{AchievementUnlock, Event, EventBus};
use crate::progress::{load_record, CorruptRecordPolicy, RecordOrigin, UserProgress, XpEntry};
use crate::rules::{self, Level, StreakChange};
use crate::storage::{Config, KvStore, PROGRESS_BACKUP_KEY, PROGRESS_KEY};

/// Engine tuning, usually derived from [`Config`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Minimum gap between accepted awards. Zero disables the limit.
    pub debounce: Duration,
    pub completion_bonus: u64,
    pub on_corrupt: CorruptRecordPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: Duration::milliseconds(config.engine.debounce_ms as i64),
            completion_bonus: config.engine.completion_bonus,
            on_corrupt: config.storage.on_corrupt,
        }
    }
}

/// What an accepted award did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardReceipt {
    pub amount: u64,
    pub source: String,
    pub new_total: u64,
    pub current_streak: u32,
    pub streak_change: StreakChange,
    pub multiplier: f64,
    pub new_achievements: Vec<AchievementUnlock>,
    pub milestones: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AwardOutcome {
    Awarded(AwardReceipt),
    /// Too soon after the previous award; nothing changed.
    Debounced { retry_after_ms: u64 },
}

impl AwardOutcome {
    pub fn receipt(&self) -> Option<&AwardReceipt> {
        match self {
            AwardOutcome::Awarded(receipt) => Some(receipt),
            AwardOutcome::Debounced { .. } => None,
        }
    }

    pub fn is_awarded(&self) -> bool {
        self.receipt().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThemeUnlockOutcome {
    Unlocked {
        theme_id: String,
        remaining_xp: u64,
        new_achievements: Vec<AchievementUnlock>,
    },
    AlreadyUnlocked { theme_id: String },
    InsufficientXp { required: u64, available: u64 },
}

impl ThemeUnlockOutcome {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, ThemeUnlockOutcome::Unlocked { .. })
    }
}

pub struct GameSystem<S: KvStore> {
    store: S,
    progress: UserProgress,
    bus: EventBus,
    options: EngineOptions,
    last_award_at: Option<DateTime<Utc>>,
}

impl<S: KvStore> GameSystem<S> {
    /// Load the record from `store` and publish [`Event::Ready`] on `bus`.
    ///
    /// A legacy or repaired record is written back immediately. Under
    /// [`CorruptRecordPolicy::Reset`] an unreadable payload is copied to
    /// [`PROGRESS_BACKUP_KEY`] before being replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written, or if the
    /// record is corrupt and the policy is [`CorruptRecordPolicy::Fail`].
    pub fn open(store: S, options: EngineOptions, bus: EventBus) -> Result<Self> {
        Self::open_at(store, options, bus, Utc::now())
    }

    pub fn open_at(
        mut store: S,
        options: EngineOptions,
        bus: EventBus,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let raw = store.get(PROGRESS_KEY)?;
        let loaded = load_record(raw.as_deref(), options.on_corrupt, now)?;

        if let RecordOrigin::Recovered { raw, .. } = &loaded.origin {
            store.set(PROGRESS_BACKUP_KEY, raw)?;
        }
        if loaded.needs_write() {
            store.set(PROGRESS_KEY, &serde_json::to_string(&loaded.progress)?)?;
            debug!(origin = ?loaded.origin, "wrote normalized progress record");
        }

        let progress = loaded.progress;
        let mut game = Self {
            last_award_at: progress.last_award_at(),
            store,
            progress,
            bus,
            options,
        };
        let ready = Event::Ready {
            progress: game.progress.clone(),
        };
        game.bus.publish(&ready);
        Ok(game)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn streak_multiplier(&self) -> f64 {
        rules::streak_multiplier(self.progress.current_streak)
    }

    pub fn current_level(&self) -> &'static Level {
        rules::level_for_xp(self.progress.total_xp)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Persist `next` and make it the current record.
    fn commit(&mut self, next: UserProgress) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.store.set(PROGRESS_KEY, &json)?;
        self.progress = next;
        Ok(())
    }

    fn publish_updated(&mut self) {
        let event = Event::Updated {
            progress: self.progress.clone(),
        };
        self.bus.publish(&event);
    }

    pub fn award_xp(&mut self, amount: u64, source: &str) -> Result<AwardOutcome> {
        self.award_xp_at(amount, source, Utc::now())
    }

    /// Award `amount` XP credited to `source` at `now`.
    ///
    /// Rejected with [`AwardOutcome::Debounced`] if the previous accepted
    /// award is less than the debounce interval ago. Streak, achievements
    /// and milestones are folded into one commit; if it fails nothing is
    /// applied and nothing is published.
    pub fn award_xp_at(
        &mut self,
        amount: u64,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<AwardOutcome> {
        if let Some(retry_after) = self.debounce_remaining(now) {
            debug!(amount, source, "xp award debounced");
            return Ok(AwardOutcome::Debounced {
                retry_after_ms: retry_after.num_milliseconds().max(0) as u64,
            });
        }

        let mut next = self.progress.clone();
        next.total_xp = next.total_xp.saturating_add(amount);
        next.xp_history.push(XpEntry {
            amount,
            source: source.to_string(),
            timestamp: now,
        });
        let streak_change = rules::update_streak(&mut next, now);
        let unlocked = rules::check_achievements(&mut next, now);
        let milestones = rules::check_milestones(&mut next);

        self.commit(next)?;
        self.last_award_at = Some(now);

        let new_achievements: Vec<AchievementUnlock> = unlocked
            .iter()
            .map(|a| AchievementUnlock::new(a, now))
            .collect();
        let multiplier = self.streak_multiplier();
        info!(
            amount,
            source,
            total = self.progress.total_xp,
            streak = self.progress.current_streak,
            "xp awarded"
        );

        self.bus.publish(&Event::XpGained {
            amount,
            source: source.to_string(),
            new_total: self.progress.total_xp,
            multiplier,
            new_achievements: new_achievements.clone(),
        });
        self.publish_updated();
        self.celebrate(&milestones);

        Ok(AwardOutcome::Awarded(AwardReceipt {
            amount,
            source: source.to_string(),
            new_total: self.progress.total_xp,
            current_streak: self.progress.current_streak,
            streak_change,
            multiplier,
            new_achievements,
            milestones,
        }))
    }

    fn debounce_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_award_at?;
        if self.options.debounce <= Duration::zero() {
            return None;
        }
        let elapsed = now - last;
        // A clock that moved backwards does not lock awards out.
        if elapsed < Duration::zero() || elapsed >= self.options.debounce {
            return None;
        }
        Some(self.options.debounce - elapsed)
    }

    /// Score a challenge report and award the result.
    pub fn on_challenge_progress(&mut self, report: &ChallengeProgress) -> Result<AwardOutcome> {
        self.on_challenge_progress_at(report, Utc::now())
    }

    pub fn on_challenge_progress_at(
        &mut self,
        report: &ChallengeProgress,
        now: DateTime<Utc>,
    ) -> Result<AwardOutcome> {
        let amount = challenge_xp(
            report,
            self.streak_multiplier(),
            self.options.completion_bonus,
        );
        self.award_xp_at(amount, CHALLENGE_SOURCE, now)
    }

    /// Unlock any achievements the current record qualifies for.
    ///
    /// Normally run as part of awards and theme purchases; exposed for
    /// records edited outside the engine.
    pub fn check_achievements(&mut self) -> Result<Vec<AchievementUnlock>> {
        self.check_achievements_at(Utc::now())
    }

    pub fn check_achievements_at(&mut self, now: DateTime<Utc>) -> Result<Vec<AchievementUnlock>> {
        let mut next = self.progress.clone();
        let unlocked = rules::check_achievements(&mut next, now);
        if unlocked.is_empty() {
            return Ok(Vec::new());
        }
        self.commit(next)?;
        self.publish_updated();
        Ok(unlocked
            .iter()
            .map(|a| AchievementUnlock::new(a, now))
            .collect())
    }

    /// Record newly reached milestones and celebrate each, ascending.
    ///
    /// Awards already do this inside their own commit; exposed for records
    /// edited outside the engine.
    pub fn check_milestones(&mut self) -> Result<Vec<u64>> {
        let mut next = self.progress.clone();
        let passed = rules::check_milestones(&mut next);
        if passed.is_empty() {
            return Ok(passed);
        }
        self.commit(next)?;
        self.celebrate(&passed);
        Ok(passed)
    }

    fn celebrate(&mut self, milestones: &[u64]) {
        let total_xp = self.progress.total_xp;
        for &milestone in milestones {
            info!(milestone, total_xp, "milestone reached");
            self.bus
                .publish(&Event::MilestoneCelebration { milestone, total_xp });
        }
    }

    pub fn unlock_theme(&mut self, theme_id: &str, cost: u64) -> Result<ThemeUnlockOutcome> {
        self.unlock_theme_at(theme_id, cost, Utc::now())
    }

    /// Spend `cost` XP to own `theme_id`. Does not activate it.
    pub fn unlock_theme_at(
        &mut self,
        theme_id: &str,
        cost: u64,
        now: DateTime<Utc>,
    ) -> Result<ThemeUnlockOutcome> {
        if self.progress.has_theme(theme_id) {
            debug!(theme_id, "theme already unlocked");
            return Ok(ThemeUnlockOutcome::AlreadyUnlocked {
                theme_id: theme_id.to_string(),
            });
        }
        if self.progress.total_xp < cost {
            debug!(theme_id, cost, available = self.progress.total_xp, "not enough xp for theme");
            return Ok(ThemeUnlockOutcome::InsufficientXp {
                required: cost,
                available: self.progress.total_xp,
            });
        }

        let mut next = self.progress.clone();
        next.total_xp -= cost;
        next.unlocked_themes.push(theme_id.to_string());
        let unlocked = rules::check_achievements(&mut next, now);
        self.commit(next)?;

        let new_achievements: Vec<AchievementUnlock> = unlocked
            .iter()
            .map(|a| AchievementUnlock::new(a, now))
            .collect();
        let remaining_xp = self.progress.total_xp;
        info!(theme_id, cost, remaining_xp, "theme unlocked");

        self.bus.publish(&Event::ThemeUnlocked {
            theme_id: theme_id.to_string(),
            remaining_xp,
            new_achievements: new_achievements.clone(),
        });
        self.publish_updated();

        Ok(ThemeUnlockOutcome::Unlocked {
            theme_id: theme_id.to_string(),
            remaining_xp,
            new_achievements,
        })
    }

    /// Make an owned theme the active one. Returns false if it is not owned.
    pub fn set_active_theme(&mut self, theme_id: &str) -> Result<bool> {
        if !self.progress.has_theme(theme_id) {
            debug!(theme_id, "cannot activate locked theme");
            return Ok(false);
        }

        let mut next = self.progress.clone();
        next.active_theme = theme_id.to_string();
        self.commit(next)?;

        self.bus.publish(&Event::ThemeChanged {
            theme_id: theme_id.to_string(),
        });
        self.publish_updated();
        Ok(true)
    }

    /// Erase all progress. Irreversible.
    pub fn reset(&mut self) -> Result<()> {
        self.commit(UserProgress::default())?;
        self.last_award_at = None;
        info!("progress reset");
        self.publish_updated();
        Ok(())
    }
}
