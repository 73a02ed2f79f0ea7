use serde_json::json;
use xpquest_core::rules::{level_progress, next_level};
use xpquest_core::Config;

use super::{open_game, print_json, CmdResult};

pub fn run() -> CmdResult {
    let config = Config::load()?;
    let game = open_game(&config)?;
    let progress = game.progress();
    let level = game.current_level();

    print_json(&json!({
        "totalXP": progress.total_xp,
        "level": level.level,
        "levelName": level.name,
        "levelProgress": level_progress(progress.total_xp),
        "nextLevel": next_level(progress.total_xp).map(|l| l.name),
        "currentStreak": progress.current_streak,
        "longestStreak": progress.longest_streak,
        "multiplier": game.streak_multiplier(),
        "activeTheme": progress.active_theme,
        "unlockedThemes": progress.unlocked_themes,
        "achievements": progress.unlocked_achievements.len(),
        "nextMilestone": progress.next_milestone(),
        "lastActivityDate": progress.last_activity_date,
    }))
}
