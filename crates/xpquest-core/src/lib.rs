//! # xpquest Core Library
//!
//! This library provides the engagement layer behind xpquest: experience
//! points for user actions, daily streaks, levels, one-time achievements and
//! milestones, and XP-purchasable cosmetic themes. The CLI binary is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Engine**: [`GameSystem`] owns the progress record and runs every
//!   change as clone, apply rules, persist, publish
//! - **Rules**: pure functions for streaks, achievements, levels and milestones
//! - **Storage**: a string key-value store (SQLite or in-memory) holding the
//!   JSON record, plus TOML configuration
//! - **Events**: an observer registry owned by the engine; listeners run
//!   after the record is committed
//! - **Themes**: a catalog loaded once from a file or URL, and an idempotent
//!   applier
//!
//! ## Key Components
//!
//! - [`GameSystem`]: XP/streak/achievement state machine
//! - [`UserProgress`]: the persisted record
//! - [`EventBus`]: engine event subscription
//! - [`Config`]: application configuration

pub mod challenge;
pub mod engine;
pub mod error;
pub mod events;
pub mod notify;
pub mod progress;
pub mod rules;
pub mod storage;
pub mod theme;

pub use challenge::{challenge_xp, ChallengeProgress};
pub use engine::{AwardOutcome, AwardReceipt, EngineOptions, GameSystem, ThemeUnlockOutcome};
pub use error::{CatalogError, ConfigError, CoreError, StorageError};
pub use events::{AchievementUnlock, Event, EventBus, SubscriptionId};
pub use progress::{UserProgress, XpEntry, DEFAULT_THEME_ID, MILESTONES};
pub use rules::{level_for_xp, streak_multiplier, Achievement, Level, ACHIEVEMENTS, LEVELS};
pub use storage::{Config, KvStore, MemoryStore, SqliteStore};
pub use theme::{Theme, ThemeApplier, ThemeCatalog, ThemeSource};
