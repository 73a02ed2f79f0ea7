use xpquest_core::{ChallengeProgress, Config};

use super::{open_game, print_json, CmdResult};

pub fn run(time_spent: f64, progress_increased: bool, completed: bool) -> CmdResult {
    let config = Config::load()?;
    let mut game = open_game(&config)?;
    let report = ChallengeProgress {
        time_spent,
        progress_increased,
        completed,
    };
    let outcome = game.on_challenge_progress(&report)?;
    print_json(&outcome)
}
