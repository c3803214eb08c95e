//! Shared marketplace state behind a single writer lock.
//!
//! [`ExchangeRegistry`] stores users, items, exchange requests, and the
//! append-only point ledger in one [`ExchangeState`] protected by a
//! [`tokio::sync::RwLock`]. A settlement touches several entities at once
//! (request status, two balances, one or two item owners), so the lock is
//! deliberately coarse: every mutating operation performs all of its
//! validation and mutation inside one write-lock critical section, which
//! makes the status-guarded transition behave like a compare-and-swap —
//! a concurrent second approval observes the terminal status and fails.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    ExchangeRequest, Item, ItemId, ItemQuery, PointTransaction, RequestId, RequestStatus, User,
    UserId,
};
use crate::error::GatewayError;

/// In-memory marketplace state.
///
/// Balance mutations go through [`ExchangeState::credit`] and
/// [`ExchangeState::debit`] only; each caller pairs them with an appended
/// ledger entry so that every balance equals the sum of its owner's ledger
/// amounts.
#[derive(Debug, Default)]
pub struct ExchangeState {
    users: HashMap<UserId, User>,
    emails: HashMap<String, UserId>,
    items: HashMap<ItemId, Item>,
    requests: HashMap<RequestId, ExchangeRequest>,
    ledger: Vec<PointTransaction>,
}

impl ExchangeState {
    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the email is already
    /// registered (emails are compared case-insensitively).
    pub fn insert_user(&mut self, user: User) -> Result<UserId, GatewayError> {
        let email_key = user.email.to_lowercase();
        if self.emails.contains_key(&email_key) {
            return Err(GatewayError::InvalidRequest(format!(
                "email {} already registered",
                user.email
            )));
        }
        let user_id = user.id;
        self.emails.insert(email_key, user_id);
        self.users.insert(user_id, user);
        Ok(user_id)
    }

    /// Returns the user with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if no such user exists.
    pub fn user(&self, id: UserId) -> Result<&User, GatewayError> {
        self.users.get(&id).ok_or(GatewayError::UserNotFound(id))
    }

    /// Looks a user up by email (case-insensitive).
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.emails
            .get(&email.to_lowercase())
            .and_then(|id| self.users.get(id))
    }

    /// Inserts a new item listing.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if the owner does not exist.
    pub fn insert_item(&mut self, item: Item) -> Result<ItemId, GatewayError> {
        if !self.users.contains_key(&item.owner) {
            return Err(GatewayError::UserNotFound(item.owner));
        }
        let item_id = item.id;
        self.items.insert(item_id, item);
        Ok(item_id)
    }

    /// Returns the item with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ItemNotFound`] if no such item exists.
    pub fn item(&self, id: ItemId) -> Result<&Item, GatewayError> {
        self.items.get(&id).ok_or(GatewayError::ItemNotFound(id))
    }

    /// Returns a mutable reference to the item with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ItemNotFound`] if no such item exists.
    pub fn item_mut(&mut self, id: ItemId) -> Result<&mut Item, GatewayError> {
        self.items
            .get_mut(&id)
            .ok_or(GatewayError::ItemNotFound(id))
    }

    /// Hard-removes an item. The caller is responsible for the
    /// no-pending-requests policy check.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ItemNotFound`] if no such item exists.
    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, GatewayError> {
        self.items.remove(&id).ok_or(GatewayError::ItemNotFound(id))
    }

    /// Inserts a new exchange request.
    pub fn insert_request(&mut self, request: ExchangeRequest) -> RequestId {
        let request_id = request.id;
        self.requests.insert(request_id, request);
        request_id
    }

    /// Returns the request with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestNotFound`] if no such request exists.
    pub fn request(&self, id: RequestId) -> Result<&ExchangeRequest, GatewayError> {
        self.requests
            .get(&id)
            .ok_or(GatewayError::RequestNotFound(id))
    }

    /// Returns a mutable reference to the request with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestNotFound`] if no such request exists.
    pub fn request_mut(&mut self, id: RequestId) -> Result<&mut ExchangeRequest, GatewayError> {
        self.requests
            .get_mut(&id)
            .ok_or(GatewayError::RequestNotFound(id))
    }

    /// Returns all requests satisfying the predicate, newest first.
    pub fn requests_where<F>(&self, predicate: F) -> Vec<ExchangeRequest>
    where
        F: Fn(&ExchangeRequest) -> bool,
    {
        let mut matched: Vec<ExchangeRequest> = self
            .requests
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    /// Returns `true` if any pending request references the item, either as
    /// the requested item or as a swap offer.
    #[must_use]
    pub fn item_has_pending_requests(&self, id: ItemId) -> bool {
        self.requests.values().any(|r| {
            r.status == RequestStatus::Pending
                && (r.item == id
                    || matches!(
                        r.kind,
                        super::RequestKind::Swap {
                            offered_item: Some(offered)
                        } if offered == id
                    ))
        })
    }

    /// Adds `amount` points to the user's balance.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for non-positive amounts and
    /// [`GatewayError::UserNotFound`] for unknown users.
    pub fn credit(&mut self, user: UserId, amount: i64) -> Result<(), GatewayError> {
        if amount <= 0 {
            return Err(GatewayError::InvalidRequest(format!(
                "credit amount must be positive, got {amount}"
            )));
        }
        let account = self
            .users
            .get_mut(&user)
            .ok_or(GatewayError::UserNotFound(user))?;
        account.balance = account.balance.saturating_add(amount);
        account.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Removes `amount` points from the user's balance.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for non-positive amounts,
    /// [`GatewayError::UserNotFound`] for unknown users, and
    /// [`GatewayError::InsufficientPoints`] if the balance would go negative;
    /// in every error case the balance is untouched.
    pub fn debit(&mut self, user: UserId, amount: i64) -> Result<(), GatewayError> {
        if amount <= 0 {
            return Err(GatewayError::InvalidRequest(format!(
                "debit amount must be positive, got {amount}"
            )));
        }
        let account = self
            .users
            .get_mut(&user)
            .ok_or(GatewayError::UserNotFound(user))?;
        if account.balance < amount {
            return Err(GatewayError::InsufficientPoints {
                required: amount,
                available: account.balance,
            });
        }
        account.balance -= amount;
        account.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Appends an entry to the immutable ledger.
    pub fn append_transaction(&mut self, entry: PointTransaction) {
        self.ledger.push(entry);
    }

    /// Returns the user's current balance.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if no such user exists.
    pub fn balance(&self, user: UserId) -> Result<i64, GatewayError> {
        self.user(user).map(|u| u.balance)
    }

    /// Returns the user's ledger entries, newest first.
    #[must_use]
    pub fn transactions_for(&self, user: UserId) -> Vec<PointTransaction> {
        let mut entries: Vec<PointTransaction> = self
            .ledger
            .iter()
            .filter(|t| t.user == user)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// Returns the ledger entries referencing the given request.
    #[must_use]
    pub fn transactions_for_request(&self, request: RequestId) -> Vec<PointTransaction> {
        self.ledger
            .iter()
            .filter(|t| t.related_request == Some(request))
            .cloned()
            .collect()
    }

    /// Returns items satisfying every set constraint of the query,
    /// descending by creation time.
    #[must_use]
    pub fn query_items(&self, query: &ItemQuery) -> Vec<Item> {
        let mut matched: Vec<Item> = self
            .items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    /// Counts used by the admin statistics view: `(users, items, requests)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.items.len(), self.requests.len())
    }

    /// Sum of all user balances.
    #[must_use]
    pub fn points_in_circulation(&self) -> i64 {
        self.users.values().map(|u| u.balance).sum()
    }

    /// Serializable copy of the full state for persistence snapshots.
    #[must_use]
    pub fn to_snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            users: self.users.values().cloned().collect(),
            items: self.items.values().cloned().collect(),
            requests: self.requests.values().cloned().collect(),
            ledger: self.ledger.clone(),
        }
    }

    /// Replaces the whole state with a restored snapshot.
    pub fn restore(&mut self, snapshot: MarketSnapshot) {
        self.users = snapshot.users.into_iter().map(|u| (u.id, u)).collect();
        self.emails = self
            .users
            .values()
            .map(|u| (u.email.to_lowercase(), u.id))
            .collect();
        self.items = snapshot.items.into_iter().map(|i| (i.id, i)).collect();
        self.requests = snapshot.requests.into_iter().map(|r| (r.id, r)).collect();
        self.ledger = snapshot.ledger;
    }
}

/// Serializable whole-state snapshot persisted by the persistence layer and
/// restored at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// All registered users.
    pub users: Vec<User>,
    /// All items, any status.
    pub items: Vec<Item>,
    /// All exchange requests, any status.
    pub requests: Vec<ExchangeRequest>,
    /// The full append-only ledger.
    pub ledger: Vec<PointTransaction>,
}

/// Shared handle to the marketplace state.
#[derive(Debug, Default)]
pub struct ExchangeRegistry {
    state: RwLock<ExchangeState>,
}

impl ExchangeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the shared read lock. Used by all read-side operations.
    pub async fn read(&self) -> RwLockReadGuard<'_, ExchangeState> {
        self.state.read().await
    }

    /// Acquires the exclusive write lock. Every mutating operation performs
    /// all validation and mutation within one such critical section.
    pub async fn write(&self) -> RwLockWriteGuard<'_, ExchangeState> {
        self.state.write().await
    }

    /// Takes a serializable snapshot of the current state.
    pub async fn snapshot(&self) -> MarketSnapshot {
        self.state.read().await.to_snapshot()
    }

    /// Replaces the state with a restored snapshot.
    pub async fn restore(&self, snapshot: MarketSnapshot) {
        self.state.write().await.restore(snapshot);
    }
}
