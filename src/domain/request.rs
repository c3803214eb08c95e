//! Exchange requests: one user's ask to acquire one item from its owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ItemId, RequestId, UserId};

/// How the requester proposes to acquire the item.
///
/// A single tagged variant replaces the two parallel swap/request shapes of
/// earlier designs: direct swaps optionally name an item offered in return,
/// points redemptions carry the offered amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestKind {
    /// Direct swap, optionally offering one of the requester's items.
    Swap {
        /// Item offered in return, owned by the requester.
        #[serde(skip_serializing_if = "Option::is_none")]
        offered_item: Option<ItemId>,
    },
    /// Points redemption at the offered amount.
    Points {
        /// Points offered. Always positive.
        amount: i64,
    },
}

/// Lifecycle status of an exchange request.
///
/// `pending → {approved, rejected}`; both outcomes are terminal, and the
/// transition happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting the owner's decision.
    Pending,
    /// Approved and settled.
    Approved,
    /// Rejected by the owner.
    Rejected,
}

impl RequestStatus {
    /// Returns `true` for terminal states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// One user's ask to acquire one item from its current owner.
///
/// `owner` is a denormalized copy of the item's owner at request time; the
/// settlement re-validates it against the item's current owner so a request
/// that went stale (the item moved through another settlement) can no longer
/// be approved. Invariant: `requester != owner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// The requested item.
    pub item: ItemId,
    /// User asking to acquire the item.
    pub requester: UserId,
    /// Item owner at request time.
    pub owner: UserId,
    /// Swap or points variant.
    pub kind: RequestKind,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the terminal transition, if any.
    pub decided_at: Option<DateTime<Utc>>,
}
