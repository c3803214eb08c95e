//! Domain events reflecting marketplace state mutations.
//!
//! Every state change emits an [`ExchangeEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers and
//! optionally persisted to the PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ItemId, ItemStatus, RequestId, UserId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ExchangeEvent {
    /// Emitted when a new user registers.
    UserRegistered {
        /// New user identifier.
        user_id: UserId,
        /// Signup bonus credited to the account.
        signup_bonus: i64,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a user submits a new listing.
    ItemSubmitted {
        /// New item identifier.
        item_id: ItemId,
        /// Listing owner.
        owner: UserId,
        /// Redemption price in points.
        points: i64,
        /// Submission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an admin approves or rejects a listing.
    ItemModerated {
        /// Moderated item.
        item_id: ItemId,
        /// Resulting status (`approved` or `rejected`).
        status: ItemStatus,
        /// Admin who made the decision.
        moderated_by: UserId,
        /// Decision timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an admin hard-removes a listing.
    ItemDeleted {
        /// Removed item.
        item_id: ItemId,
        /// Admin who removed it.
        deleted_by: UserId,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an exchange request is created.
    RequestCreated {
        /// New request identifier.
        request_id: RequestId,
        /// Requested item.
        item_id: ItemId,
        /// Requesting user.
        requester: UserId,
        /// Item owner at request time.
        owner: UserId,
        /// Request kind discriminator (`"swap"` or `"points"`).
        kind: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a request is approved and settled.
    RequestSettled {
        /// Settled request.
        request_id: RequestId,
        /// Requested item.
        item_id: ItemId,
        /// Requesting user (new owner for swap settlements).
        requester: UserId,
        /// Previous owner.
        owner: UserId,
        /// Request kind discriminator (`"swap"` or `"points"`).
        kind: String,
        /// Points moved from requester to owner (0 for direct swaps).
        points_transferred: i64,
        /// Item offered in return, for bidirectional swaps.
        offered_item: Option<ItemId>,
        /// Settlement timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when the owner rejects a request.
    RequestRejected {
        /// Rejected request.
        request_id: RequestId,
        /// Requested item.
        item_id: ItemId,
        /// Rejection timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ExchangeEvent {
    /// Returns the item this event concerns, when it concerns one.
    ///
    /// Used by the WebSocket layer for per-item subscription filtering;
    /// user-scoped events (registration) return `None` and only reach
    /// wildcard subscribers.
    #[must_use]
    pub const fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::UserRegistered { .. } => None,
            Self::ItemSubmitted { item_id, .. }
            | Self::ItemModerated { item_id, .. }
            | Self::ItemDeleted { item_id, .. }
            | Self::RequestCreated { item_id, .. }
            | Self::RequestSettled { item_id, .. }
            | Self::RequestRejected { item_id, .. } => Some(*item_id),
        }
    }

    /// Returns the `event_type` discriminator string.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user_registered",
            Self::ItemSubmitted { .. } => "item_submitted",
            Self::ItemModerated { .. } => "item_moderated",
            Self::ItemDeleted { .. } => "item_deleted",
            Self::RequestCreated { .. } => "request_created",
            Self::RequestSettled { .. } => "request_settled",
            Self::RequestRejected { .. } => "request_rejected",
        }
    }
}
