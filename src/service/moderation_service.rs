//! Admin moderation workflow: listing approval gates and platform stats.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    EventBus, ExchangeEvent, ExchangeRegistry, Item, ItemId, ItemQuery, ItemStatus, RequestStatus,
    UserId,
};
use crate::error::GatewayError;
use crate::service::catalog_service::ItemWithOwner;

/// Aggregate platform statistics for the admin dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlatformStats {
    /// Registered users.
    pub total_users: usize,
    /// Items in any status.
    pub total_items: usize,
    /// Exchange requests in any status.
    pub total_requests: usize,
    /// Moderation queue depth.
    pub pending_items: usize,
    /// Requests that reached `approved`.
    pub settled_requests: usize,
    /// Sum of all user balances.
    pub points_in_circulation: i64,
}

/// Parallel, simpler state machine gating item visibility
/// (`pending → approved | rejected`). No ledger interaction.
#[derive(Debug, Clone)]
pub struct ModerationService {
    registry: Arc<ExchangeRegistry>,
    event_bus: EventBus,
}

impl ModerationService {
    /// Creates a new `ModerationService`.
    #[must_use]
    pub fn new(registry: Arc<ExchangeRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    /// Sets an item's moderation status to `approved` or `rejected`.
    ///
    /// Re-applying the current status is a no-op, not an error. A `swapped`
    /// item is terminal and can no longer be moderated.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] if the caller is not an admin,
    /// [`GatewayError::ItemNotFound`] for unknown items, and
    /// [`GatewayError::InvalidRequest`] for a non-moderation target status or
    /// a `swapped` item.
    pub async fn set_item_status(
        &self,
        item_id: ItemId,
        status: ItemStatus,
        acting_admin: UserId,
    ) -> Result<Item, GatewayError> {
        if !matches!(status, ItemStatus::Approved | ItemStatus::Rejected) {
            return Err(GatewayError::InvalidRequest(
                "moderation status must be approved or rejected".to_string(),
            ));
        }

        let mut state = self.registry.write().await;
        require_admin(&state, acting_admin)?;

        let item = state.item(item_id)?;
        if item.status == ItemStatus::Swapped {
            return Err(GatewayError::InvalidRequest(format!(
                "item {item_id} has been swapped and can no longer be moderated"
            )));
        }
        if item.status == status {
            return Ok(item.clone());
        }

        let moderated = {
            let stored = state.item_mut(item_id)?;
            stored.status = status;
            stored.updated_at = Utc::now();
            stored.clone()
        };
        drop(state);

        let _ = self.event_bus.publish(ExchangeEvent::ItemModerated {
            item_id,
            status,
            moderated_by: acting_admin,
            timestamp: Utc::now(),
        });

        tracing::info!(item_id = %item_id, ?status, "item moderated");
        Ok(moderated)
    }

    /// Hard-removes an item.
    ///
    /// Deletion is refused while any pending request references the item,
    /// either as the requested item or as a swap offer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] if the caller is not an admin,
    /// [`GatewayError::ItemNotFound`] for unknown items, and
    /// [`GatewayError::InvalidRequest`] while pending requests reference it.
    pub async fn delete_item(
        &self,
        item_id: ItemId,
        acting_admin: UserId,
    ) -> Result<(), GatewayError> {
        let mut state = self.registry.write().await;
        require_admin(&state, acting_admin)?;

        let _ = state.item(item_id)?;
        if state.item_has_pending_requests(item_id) {
            return Err(GatewayError::InvalidRequest(format!(
                "item {item_id} has pending exchange requests"
            )));
        }

        let _ = state.remove_item(item_id)?;
        drop(state);

        let _ = self.event_bus.publish(ExchangeEvent::ItemDeleted {
            item_id,
            deleted_by: acting_admin,
            timestamp: Utc::now(),
        });

        tracing::info!(item_id = %item_id, "item deleted");
        Ok(())
    }

    /// Returns the moderation queue (pending items, newest first, owners
    /// joined).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] if the caller is not an admin.
    pub async fn pending_items(
        &self,
        acting_admin: UserId,
    ) -> Result<Vec<ItemWithOwner>, GatewayError> {
        let state = self.registry.read().await;
        require_admin(&state, acting_admin)?;

        let query = ItemQuery {
            status: Some(ItemStatus::Pending),
            ..ItemQuery::default()
        };
        Ok(state
            .query_items(&query)
            .into_iter()
            .filter_map(|item| {
                let owner = state.user(item.owner).ok()?.clone();
                Some(ItemWithOwner { item, owner })
            })
            .collect())
    }

    /// Returns aggregate platform statistics.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] if the caller is not an admin.
    pub async fn platform_stats(
        &self,
        acting_admin: UserId,
    ) -> Result<PlatformStats, GatewayError> {
        let state = self.registry.read().await;
        require_admin(&state, acting_admin)?;

        let (total_users, total_items, total_requests) = state.counts();
        let pending_items = state
            .query_items(&ItemQuery {
                status: Some(ItemStatus::Pending),
                ..ItemQuery::default()
            })
            .len();
        let settled_requests = state
            .requests_where(|r| r.status == RequestStatus::Approved)
            .len();

        Ok(PlatformStats {
            total_users,
            total_items,
            total_requests,
            pending_items,
            settled_requests,
            points_in_circulation: state.points_in_circulation(),
        })
    }
}

/// Verifies the acting user exists and holds the admin role.
fn require_admin(
    state: &crate::domain::ExchangeState,
    acting: UserId,
) -> Result<(), GatewayError> {
    let user = state.user(acting)?;
    if !user.is_admin() {
        return Err(GatewayError::Unauthorized(
            "admin role required".to_string(),
        ));
    }
    Ok(())
}
