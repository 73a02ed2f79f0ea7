//! Property tests for the XP engine.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use xpquest_core::{EngineOptions, EventBus, GameSystem, MemoryStore};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap()
}

fn open() -> GameSystem<MemoryStore> {
    GameSystem::open_at(MemoryStore::new(), EngineOptions::default(), EventBus::new(), t0())
        .unwrap()
}

proptest! {
    #[test]
    fn total_is_sum_of_accepted_awards(
        steps in prop::collection::vec((0u64..500, 0i64..2_000), 1..40)
    ) {
        let mut game = open();
        let debounce = EngineOptions::default().debounce;
        let mut now = t0();
        let mut last_accepted: Option<DateTime<Utc>> = None;
        let mut expected = 0u64;

        for (amount, gap_ms) in steps {
            now += Duration::milliseconds(gap_ms);
            let should_accept = last_accepted.map_or(true, |last| now - last >= debounce);
            let outcome = game.award_xp_at(amount, "prop", now).unwrap();
            prop_assert_eq!(outcome.is_awarded(), should_accept);
            if should_accept {
                expected += amount;
                last_accepted = Some(now);
            }
        }

        prop_assert_eq!(game.progress().total_xp, expected);
        let history_sum: u64 = game.progress().xp_history.iter().map(|e| e.amount).sum();
        prop_assert_eq!(history_sum, expected);
    }

    #[test]
    fn achievements_and_milestones_never_repeat(
        ops in prop::collection::vec((0u64..800, 0u32..4, any::<bool>()), 1..30)
    ) {
        let mut game = open();
        let mut now = t0();
        let mut longest_seen = 0;

        for (i, (amount, day_gap, buy)) in ops.into_iter().enumerate() {
            now += Duration::days(day_gap as i64) + Duration::seconds(1);
            game.award_xp_at(amount, "prop", now).unwrap();
            if buy {
                game.unlock_theme_at(&format!("theme-{i}"), amount / 2, now).unwrap();
            }

            let p = game.progress();
            let mut ids = p.unlocked_achievements.clone();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), p.unlocked_achievements.len());
            prop_assert_eq!(p.achievement_unlock_times.len(), p.unlocked_achievements.len());

            let mut milestones = p.passed_milestones.clone();
            milestones.dedup();
            prop_assert_eq!(&milestones, &p.passed_milestones);

            prop_assert!(p.longest_streak >= longest_seen);
            prop_assert!(p.longest_streak >= p.current_streak);
            longest_seen = p.longest_streak;

            prop_assert!(p.has_theme(xpquest_core::DEFAULT_THEME_ID));
        }
    }
}
