use serde_json::json;
use xpquest_core::{Config, LEVELS};

use super::{open_game, print_json, CmdResult};

pub fn run() -> CmdResult {
    let config = Config::load()?;
    let game = open_game(&config)?;
    let current = game.current_level().level;

    let rows: Vec<serde_json::Value> = LEVELS
        .iter()
        .map(|l| {
            json!({
                "level": l.level,
                "name": l.name,
                "minXp": l.min_xp,
                "description": l.description,
                "current": l.level == current,
            })
        })
        .collect();
    print_json(&rows)
}
