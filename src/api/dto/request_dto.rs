//! Exchange request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ExchangeRequest, ItemId, RequestId, RequestKind, RequestStatus, UserId};

/// Request body for `POST /requests`.
///
/// The kind variant is flattened: `{"item_id": "...", "kind": "points",
/// "amount": 40}` or `{"item_id": "...", "kind": "swap",
/// "offered_item": "..."}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestRequest {
    /// The requested item.
    pub item_id: ItemId,
    /// Swap or points variant.
    #[serde(flatten)]
    pub kind: RequestKind,
}

/// Full exchange request representation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDto {
    /// Request identifier.
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

impl From<ExchangeRequest> for RequestDto {
    fn from(request: ExchangeRequest) -> Self {
        Self {
            id: request.id,
            item: request.item,
            requester: request.requester,
            owner: request.owner,
            kind: request.kind,
            status: request.status,
            created_at: request.created_at,
            decided_at: request.decided_at,
        }
    }
}

/// Response body for request listings (incoming/outgoing views).
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestListResponse {
    /// Matching requests, newest first.
    pub data: Vec<RequestDto>,
}
