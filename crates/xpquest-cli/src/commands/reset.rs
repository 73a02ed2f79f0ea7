use xpquest_core::Config;

use super::{open_game, CmdResult};

pub fn run(yes: bool) -> CmdResult {
    if !yes {
        return Err("refusing to erase progress without --yes".into());
    }
    let config = Config::load()?;
    let mut game = open_game(&config)?;
    game.reset()?;
    println!("progress reset");
    Ok(())
}
