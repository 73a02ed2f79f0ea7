use xpquest_core::{Config, XpEntry};

use super::{open_game, print_json, CmdResult};

pub fn run(limit: usize) -> CmdResult {
    let config = Config::load()?;
    let game = open_game(&config)?;
    let recent: Vec<&XpEntry> = game.progress().xp_history.iter().rev().take(limit).collect();
    print_json(&recent)
}
