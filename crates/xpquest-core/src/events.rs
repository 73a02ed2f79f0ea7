use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver};

use crate::progress::UserProgress;
use crate::rules::Achievement;

/// An achievement unlocked by a single engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementUnlock {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
}

impl AchievementUnlock {
    pub fn new(achievement: &Achievement, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: achievement.id.to_string(),
            name: achievement.name.to_string(),
            description: achievement.description.to_string(),
            unlocked_at,
        }
    }
}

/// Every committed state change in the engine produces an Event.
/// Listeners see them only after the record has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The engine finished loading its record.
    Ready { progress: UserProgress },
    /// The record changed.
    Updated { progress: UserProgress },
    XpGained {
        amount: u64,
        source: String,
        new_total: u64,
        multiplier: f64,
        new_achievements: Vec<AchievementUnlock>,
    },
    MilestoneCelebration { milestone: u64, total_xp: u64 },
    ThemeUnlocked {
        theme_id: String,
        remaining_xp: u64,
        new_achievements: Vec<AchievementUnlock>,
    },
    ThemeChanged { theme_id: String },
}

impl Event {
    /// Stable event name, matching the labels the web client dispatched.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Ready { .. } => "ready",
            Event::Updated { .. } => "updated",
            Event::XpGained { .. } => "xpGained",
            Event::MilestoneCelebration { .. } => "milestoneCelebration",
            Event::ThemeUnlocked { .. } => "themeUnlocked",
            Event::ThemeChanged { .. } => "themeChanged",
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Event)>;

/// Observer registry owned by an engine instance.
///
/// Delivery is synchronous and in subscription order. Listeners cannot
/// fail or veto; they only observe.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Subscribe a channel instead of a closure, for consumers that drain
    /// events on their own schedule.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<Event>) {
        let (tx, rx) = channel();
        let id = self.subscribe(move |event| {
            // A dropped receiver just means nobody is draining anymore.
            let _ = tx.send(event.clone());
        });
        (id, rx)
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: &Event) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn changed(id: &str) -> Event {
        Event::ThemeChanged {
            theme_id: id.to_string(),
        }
    }

    #[test]
    fn delivers_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let a = Rc::clone(&seen);
        bus.subscribe(move |_| a.borrow_mut().push("a"));
        let b = Rc::clone(&seen);
        bus.subscribe(move |_| b.borrow_mut().push("b"));

        bus.publish(&changed("zen"));
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);

        bus.publish(&changed("zen"));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&changed("zen"));
        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn channel_subscriber_drains() {
        let mut bus = EventBus::new();
        let (_, rx) = bus.subscribe_channel();
        bus.publish(&changed("zen"));
        bus.publish(&changed("ocean"));
        let drained: Vec<Event> = rx.try_iter().collect();
        assert_eq!(drained, vec![changed("zen"), changed("ocean")]);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Event::MilestoneCelebration {
            milestone: 100,
            total_xp: 120,
        })
        .unwrap();
        assert_eq!(json["type"], "MilestoneCelebration");
        assert_eq!(json["milestone"], 100);
        assert_eq!(changed("x").name(), "themeChanged");
    }
}
