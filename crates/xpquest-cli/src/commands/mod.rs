pub mod achievements;
pub mod award;
pub mod challenge;
pub mod config;
pub mod history;
pub mod levels;
pub mod reset;
pub mod status;
pub mod theme;

use serde::Serialize;
use xpquest_core::notify::NotificationPlanner;
use xpquest_core::{Config, EngineOptions, EventBus, GameSystem, SqliteStore};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the engine on the default store, echoing events to stderr.
///
/// Each event is written as `event: {json}`; notifications it would raise
/// follow as `notify: {json}`.
pub fn open_game(config: &Config) -> Result<GameSystem<SqliteStore>, Box<dyn std::error::Error>> {
    let planner = NotificationPlanner::new(config.notifications.clone());
    let mut bus = EventBus::new();
    bus.subscribe(move |event| {
        match serde_json::to_string(event) {
            Ok(json) => eprintln!("event: {json}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode event"),
        }
        for spec in planner.plan(event) {
            if let Ok(json) = serde_json::to_string(&spec) {
                eprintln!("notify: {json}");
            }
        }
    });

    let store = SqliteStore::open()?;
    Ok(GameSystem::open(store, EngineOptions::from(config), bus)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
