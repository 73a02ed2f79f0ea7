use xpquest_core::Config;

use super::{open_game, print_json, CmdResult};

pub fn run(amount: u64, source: &str) -> CmdResult {
    let config = Config::load()?;
    let mut game = open_game(&config)?;
    let outcome = game.award_xp(amount, source)?;
    print_json(&outcome)
}
