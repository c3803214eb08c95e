//! Append-only point ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{RequestId, TransactionId, UserId};

/// Classification of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Points earned through platform activity.
    Earned,
    /// Points spent outside settlement.
    Spent,
    /// Settlement debit on the requester.
    Debit,
    /// Settlement credit on the item owner.
    Credit,
    /// Platform-granted bonus (e.g. signup).
    Bonus,
}

/// One immutable ledger entry.
///
/// Entries are append-only: never mutated or deleted. Positive amounts are
/// credits, negative amounts are debits. For any settled points request
/// exactly two entries reference it, and their amounts are exact negatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTransaction {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// User whose balance the entry changed.
    pub user: UserId,
    /// Signed amount: positive credit, negative debit.
    pub amount: i64,
    /// Entry classification.
    pub kind: TransactionKind,
    /// Human-readable description.
    pub description: String,
    /// Settlement request that produced the entry, if any.
    pub related_request: Option<RequestId>,
    /// Entry timestamp.
    pub created_at: DateTime<Utc>,
}

impl PointTransaction {
    /// Builds a new ledger entry stamped with the current time.
    #[must_use]
    pub fn new(
        user: UserId,
        amount: i64,
        kind: TransactionKind,
        description: String,
        related_request: Option<RequestId>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user,
            amount,
            kind,
            description,
            related_request,
            created_at: Utc::now(),
        }
    }
}
