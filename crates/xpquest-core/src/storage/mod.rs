mod config;
mod kv;
mod memory;

pub use config::{Config, EngineConfig, NotificationsConfig, StorageConfig, ThemesConfig};
pub use kv::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Key holding the JSON-encoded progress record.
pub const PROGRESS_KEY: &str = "user_progress";

/// Key receiving an unreadable progress payload before it is replaced.
pub const PROGRESS_BACKUP_KEY: &str = "user_progress.corrupt";

/// A string key-value store.
///
/// Writes overwrite the whole value under a key; there is no compare-and-swap,
/// so two processes sharing a store resolve conflicts by last write wins.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Returns `~/.config/xpquest[-dev]/` based on XPQUEST_ENV.
///
/// Set XPQUEST_ENV=dev to use the development data directory, or
/// XPQUEST_HOME to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("XPQUEST_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("XPQUEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("xpquest-dev")
            } else {
                base_dir.join("xpquest")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
