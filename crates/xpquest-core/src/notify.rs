//! Local notification planning.
//!
//! Display is the host's job (a service worker, a desktop notifier). This
//! module decides what a notification says and where a click goes, from
//! either an inbound push payload or an engine [`Event`].

use serde::{Deserialize, Serialize};

use crate::events::{AchievementUnlock, Event};
use crate::storage::NotificationsConfig;

/// Inbound push payload; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A notification ready to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSpec {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub tag: String,
    pub url: String,
}

pub const DEFAULT_TAG: &str = "xpquest";
pub const DEFAULT_BODY: &str = "You have a new update.";

impl NotificationSpec {
    /// Fill absent payload fields from configured defaults.
    pub fn from_push(payload: PushPayload, defaults: &NotificationsConfig) -> Self {
        Self {
            title: payload
                .title
                .unwrap_or_else(|| defaults.default_title.clone()),
            body: payload.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            icon: payload.icon.unwrap_or_else(|| defaults.icon.clone()),
            tag: payload.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
            url: payload.url.unwrap_or_else(|| defaults.default_url.clone()),
        }
    }
}

/// An open client window the host knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientWindow {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    Focus { window_id: String },
    Open { url: String },
}

/// Focus an existing window showing `target`, or open a new one.
///
/// A window matches if its URL equals the target or ends with it, so a
/// relative target like `/progress` matches `https://host/progress`.
pub fn route_click(target: &str, windows: &[ClientWindow]) -> ClickAction {
    windows
        .iter()
        .find(|w| w.url == target || w.url.ends_with(target))
        .map(|w| ClickAction::Focus {
            window_id: w.id.clone(),
        })
        .unwrap_or_else(|| ClickAction::Open {
            url: target.to_string(),
        })
}

/// Maps engine events to celebratory local notifications.
#[derive(Debug, Clone)]
pub struct NotificationPlanner {
    config: NotificationsConfig,
}

impl NotificationPlanner {
    pub fn new(config: NotificationsConfig) -> Self {
        Self { config }
    }

    /// Notifications worth showing for `event`; empty when disabled.
    pub fn plan(&self, event: &Event) -> Vec<NotificationSpec> {
        if !self.config.enabled {
            return Vec::new();
        }

        let mut out = Vec::new();
        match event {
            Event::MilestoneCelebration { milestone, total_xp } => {
                out.push(self.spec(
                    format!("{milestone} XP milestone!"),
                    format!("You now have {total_xp} XP. Keep going!"),
                    format!("milestone-{milestone}"),
                ));
            }
            Event::XpGained {
                new_achievements, ..
            } => self.push_achievements(&mut out, new_achievements),
            Event::ThemeUnlocked {
                theme_id,
                remaining_xp,
                new_achievements,
            } => {
                out.push(self.spec(
                    format!("Theme unlocked: {theme_id}"),
                    format!("{remaining_xp} XP left to spend."),
                    format!("theme-{theme_id}"),
                ));
                self.push_achievements(&mut out, new_achievements);
            }
            _ => {}
        }
        out
    }

    fn push_achievements(&self, out: &mut Vec<NotificationSpec>, unlocks: &[AchievementUnlock]) {
        for a in unlocks {
            out.push(self.spec(
                format!("Achievement unlocked: {}", a.name),
                a.description.clone(),
                format!("achievement-{}", a.id),
            ));
        }
    }

    fn spec(&self, title: String, body: String, tag: String) -> NotificationSpec {
        NotificationSpec {
            title,
            body,
            icon: self.config.icon.clone(),
            tag,
            url: self.config.default_url.clone(),
        }
    }
}
