//! Exchange request lifecycle and settlement.
//!
//! [`ExchangeService`] owns the request state machine
//! (`pending → {approved, rejected}`) and the settlement that approval
//! triggers: ownership transfer for direct swaps, debit/credit plus ledger
//! entries for points redemptions. Every mutation method follows the
//! pattern: acquire the state write lock → validate everything → mutate →
//! emit events. No mutation happens before the last validation, so every
//! failure leaves the state exactly as it was.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    EventBus, ExchangeEvent, ExchangeRegistry, ExchangeRequest, ItemId, ItemStatus,
    PointTransaction, RequestId, RequestKind, RequestStatus, TransactionKind, UserId,
};
use crate::error::GatewayError;

/// Orchestration layer for the request lifecycle and settlement.
#[derive(Debug, Clone)]
pub struct ExchangeService {
    registry: Arc<ExchangeRegistry>,
    event_bus: EventBus,
}

impl ExchangeService {
    /// Creates a new `ExchangeService`.
    #[must_use]
    pub fn new(registry: Arc<ExchangeRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`ExchangeRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ExchangeRegistry> {
        &self.registry
    }

    /// Creates a new pending exchange request.
    ///
    /// The item must exist and be approved, the requester must not be its
    /// owner, a points offer must be positive and covered by the requester's
    /// current balance, and a swap offer must name an approved item owned by
    /// the requester. The item's owner is denormalized onto the request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ItemNotFound`] / [`GatewayError::UserNotFound`]
    /// for missing entities, [`GatewayError::InvalidRequest`] for precondition
    /// violations, and [`GatewayError::InsufficientPoints`] when the offer
    /// exceeds the requester's balance.
    pub async fn create_request(
        &self,
        requester: UserId,
        item_id: ItemId,
        kind: RequestKind,
    ) -> Result<ExchangeRequest, GatewayError> {
        let mut state = self.registry.write().await;

        let _ = state.user(requester)?;
        let item = state.item(item_id)?.clone();

        if item.status != ItemStatus::Approved {
            return Err(GatewayError::InvalidRequest(format!(
                "item {item_id} is not available for exchange"
            )));
        }
        if item.owner == requester {
            return Err(GatewayError::InvalidRequest(
                "cannot request your own item".to_string(),
            ));
        }

        match kind {
            RequestKind::Points { amount } => {
                if amount <= 0 {
                    return Err(GatewayError::InvalidRequest(format!(
                        "offered points must be positive, got {amount}"
                    )));
                }
                let available = state.balance(requester)?;
                if available < amount {
                    return Err(GatewayError::InsufficientPoints {
                        required: amount,
                        available,
                    });
                }
            }
            RequestKind::Swap {
                offered_item: Some(offered_id),
            } => {
                if offered_id == item_id {
                    return Err(GatewayError::InvalidRequest(
                        "offered item cannot be the requested item".to_string(),
                    ));
                }
                let offered = state.item(offered_id)?;
                if offered.owner != requester {
                    return Err(GatewayError::InvalidRequest(format!(
                        "offered item {offered_id} is not owned by the requester"
                    )));
                }
                if offered.status != ItemStatus::Approved {
                    return Err(GatewayError::InvalidRequest(format!(
                        "offered item {offered_id} is not available for exchange"
                    )));
                }
            }
            RequestKind::Swap { offered_item: None } => {}
        }

        let request = ExchangeRequest {
            id: RequestId::new(),
            item: item_id,
            requester,
            owner: item.owner,
            kind,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        };
        let created = request.clone();
        let _ = state.insert_request(request);
        drop(state);

        let _ = self.event_bus.publish(ExchangeEvent::RequestCreated {
            request_id: created.id,
            item_id,
            requester,
            owner: created.owner,
            kind: kind_str(&created.kind).to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            request_id = %created.id,
            item_id = %item_id,
            kind = kind_str(&created.kind),
            "exchange request created"
        );
        Ok(created)
    }

    /// Approves a pending request and settles it atomically.
    ///
    /// The status transition, the balance check, the debit/credit pair, and
    /// the item ownership/status change all happen inside one write-lock
    /// critical section, with every validation preceding the first mutation.
    /// Two concurrent approvals of the same request therefore yield exactly
    /// one success; the loser observes the terminal status and gets
    /// [`GatewayError::AlreadySettled`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestNotFound`] for unknown requests,
    /// [`GatewayError::AlreadySettled`] when the request left `pending`,
    /// [`GatewayError::Unauthorized`] when the caller is not the recorded
    /// owner, [`GatewayError::InvalidRequest`] when the item moved or became
    /// unavailable since the request was created, and
    /// [`GatewayError::InsufficientPoints`] when the requester can no longer
    /// cover a points offer. No error path applies any mutation.
    pub async fn approve_request(
        &self,
        request_id: RequestId,
        acting_user: UserId,
    ) -> Result<ExchangeRequest, GatewayError> {
        let mut state = self.registry.write().await;

        let request = state.request(request_id)?.clone();
        if request.status != RequestStatus::Pending {
            return Err(GatewayError::AlreadySettled(request_id));
        }
        if acting_user != request.owner {
            return Err(GatewayError::Unauthorized(
                "only the item owner may approve a request".to_string(),
            ));
        }

        let item = state.item(request.item)?.clone();
        if item.status != ItemStatus::Approved {
            return Err(GatewayError::InvalidRequest(format!(
                "item {} is no longer available",
                request.item
            )));
        }
        if item.owner != request.owner {
            return Err(GatewayError::InvalidRequest(format!(
                "item {} changed owner since the request was created",
                request.item
            )));
        }
        let _ = state.user(request.requester)?;
        let _ = state.user(request.owner)?;

        let mut points_transferred = 0i64;
        let mut offered_transfer: Option<ItemId> = None;

        match request.kind {
            RequestKind::Swap { offered_item } => {
                if let Some(offered_id) = offered_item {
                    let offered = state.item(offered_id)?;
                    if offered.owner != request.requester {
                        return Err(GatewayError::InvalidRequest(format!(
                            "offered item {offered_id} is no longer owned by the requester"
                        )));
                    }
                    if offered.status != ItemStatus::Approved {
                        return Err(GatewayError::InvalidRequest(format!(
                            "offered item {offered_id} is no longer available"
                        )));
                    }
                    offered_transfer = Some(offered_id);
                }

                // Validation complete; mutations start here.
                let now = Utc::now();
                let requested = state.item_mut(request.item)?;
                requested.owner = request.requester;
                requested.updated_at = now;
                if let Some(offered_id) = offered_transfer {
                    let offered = state.item_mut(offered_id)?;
                    offered.owner = request.owner;
                    offered.updated_at = now;
                }
            }
            RequestKind::Points { amount } => {
                let available = state.balance(request.requester)?;
                if available < amount {
                    return Err(GatewayError::InsufficientPoints {
                        required: amount,
                        available,
                    });
                }

                // Validation complete; mutations start here. Debit cannot
                // fail after the balance check above, and credit cannot fail
                // after the user lookups: both run under the same lock.
                state.debit(request.requester, amount)?;
                state.credit(request.owner, amount)?;
                state.append_transaction(PointTransaction::new(
                    request.requester,
                    -amount,
                    TransactionKind::Debit,
                    format!("Points sent for \"{}\"", item.title),
                    Some(request_id),
                ));
                state.append_transaction(PointTransaction::new(
                    request.owner,
                    amount,
                    TransactionKind::Credit,
                    format!("Points received for \"{}\"", item.title),
                    Some(request_id),
                ));

                let requested = state.item_mut(request.item)?;
                requested.status = ItemStatus::Swapped;
                requested.updated_at = Utc::now();
                points_transferred = amount;
            }
        }

        let decided_at = Utc::now();
        let settled = {
            let stored = state.request_mut(request_id)?;
            stored.status = RequestStatus::Approved;
            stored.decided_at = Some(decided_at);
            stored.clone()
        };
        drop(state);

        let _ = self.event_bus.publish(ExchangeEvent::RequestSettled {
            request_id,
            item_id: settled.item,
            requester: settled.requester,
            owner: settled.owner,
            kind: kind_str(&settled.kind).to_string(),
            points_transferred,
            offered_item: offered_transfer,
            timestamp: decided_at,
        });

        tracing::info!(
            request_id = %request_id,
            kind = kind_str(&settled.kind),
            points_transferred,
            "exchange request settled"
        );
        Ok(settled)
    }

    /// Rejects a pending request. Same pending and authorization guards as
    /// approval; no settlement side effects.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestNotFound`],
    /// [`GatewayError::AlreadySettled`], or [`GatewayError::Unauthorized`]
    /// under the same conditions as [`ExchangeService::approve_request`].
    pub async fn reject_request(
        &self,
        request_id: RequestId,
        acting_user: UserId,
    ) -> Result<ExchangeRequest, GatewayError> {
        let mut state = self.registry.write().await;

        let request = state.request(request_id)?.clone();
        if request.status != RequestStatus::Pending {
            return Err(GatewayError::AlreadySettled(request_id));
        }
        if acting_user != request.owner {
            return Err(GatewayError::Unauthorized(
                "only the item owner may reject a request".to_string(),
            ));
        }

        let decided_at = Utc::now();
        let rejected = {
            let stored = state.request_mut(request_id)?;
            stored.status = RequestStatus::Rejected;
            stored.decided_at = Some(decided_at);
            stored.clone()
        };
        drop(state);

        let _ = self.event_bus.publish(ExchangeEvent::RequestRejected {
            request_id,
            item_id: rejected.item,
            timestamp: decided_at,
        });

        tracing::info!(request_id = %request_id, "exchange request rejected");
        Ok(rejected)
    }

    /// Returns the request with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestNotFound`] if no such request exists.
    pub async fn get_request(&self, id: RequestId) -> Result<ExchangeRequest, GatewayError> {
        self.registry.read().await.request(id).cloned()
    }

    /// Requests addressed to the given owner, newest first (incoming view).
    pub async fn requests_for_owner(&self, owner: UserId) -> Vec<ExchangeRequest> {
        self.registry
            .read()
            .await
            .requests_where(|r| r.owner == owner)
    }

    /// Requests created by the given user, newest first (outgoing view).
    pub async fn requests_for_requester(&self, requester: UserId) -> Vec<ExchangeRequest> {
        self.registry
            .read()
            .await
            .requests_where(|r| r.requester == requester)
    }
}

/// Discriminator string for a request kind, as used in events and logs.
const fn kind_str(kind: &RequestKind) -> &'static str {
    match kind {
        RequestKind::Swap { .. } => "swap",
        RequestKind::Points { .. } => "points",
    }
}
