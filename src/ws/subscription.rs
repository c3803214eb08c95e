//! Per-connection subscription manager.
//!
//! Tracks which item IDs a WebSocket client is subscribed to and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::ItemId;

/// Manages the set of item subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed item IDs. If `subscribe_all` is true, this set is ignored.
    item_ids: HashSet<ItemId>,
    /// Whether the client subscribes to all events (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds item IDs to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, ids: &[ItemId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for id in ids {
            self.item_ids.insert(*id);
        }
    }

    /// Removes item IDs from the subscription set.
    pub fn unsubscribe(&mut self, ids: &[ItemId]) {
        for id in ids {
            self.item_ids.remove(id);
        }
    }

    /// Returns `true` if an event concerning `item_id` matches the filter.
    /// Events with no item (e.g. registrations) only reach wildcard
    /// subscribers.
    #[must_use]
    pub fn matches(&self, item_id: Option<ItemId>) -> bool {
        if self.subscribe_all {
            return true;
        }
        item_id.is_some_and(|id| self.item_ids.contains(&id))
    }

    /// Returns the number of explicitly subscribed item IDs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.item_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
