use chrono::{DateTime, Utc};
use serde::Serialize;
use xpquest_core::{Config, ACHIEVEMENTS};

use super::{open_game, print_json, CmdResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AchievementRow {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    unlocked: bool,
    unlocked_at: Option<DateTime<Utc>>,
}

pub fn run() -> CmdResult {
    let config = Config::load()?;
    let game = open_game(&config)?;
    let progress = game.progress();

    let rows: Vec<AchievementRow> = ACHIEVEMENTS
        .iter()
        .map(|a| AchievementRow {
            id: a.id,
            name: a.name,
            description: a.description,
            unlocked: progress.has_achievement(a.id),
            unlocked_at: progress.achievement_unlock_times.get(a.id).copied(),
        })
        .collect();
    print_json(&rows)
}
