//! Admin endpoints: moderation queue, status gating, deletion, stats.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, put};
use axum::{Json, Router};

use crate::api::auth::Caller;
use crate::api::dto::{ItemDto, ModerateItemRequest};
use crate::app_state::AppState;
use crate::domain::ItemId;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::PlatformStats;

/// `GET /admin/items/pending` — The moderation queue.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] for non-admin callers.
#[utoipa::path(
    get,
    path = "/api/v1/admin/items/pending",
    tag = "Moderation",
    summary = "List items pending moderation",
    responses(
        (status = 200, description = "Pending items, newest first", body = [ItemDto]),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn pending_items(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, GatewayError> {
    let queue = state.moderation.pending_items(caller.user_id).await?;
    let data: Vec<ItemDto> = queue.into_iter().map(ItemDto::from).collect();
    Ok(Json(data))
}

/// `PUT /admin/items/{id}/status` — Approve or reject a listing.
///
/// Re-applying the current status is a no-op; a swapped item can no longer
/// be moderated.
///
/// # Errors
///
/// Returns [`GatewayError`] for non-admin callers, unknown items, or
/// invalid target statuses.
#[utoipa::path(
    put,
    path = "/api/v1/admin/items/{id}/status",
    tag = "Moderation",
    summary = "Set an item's moderation status",
    params(
        ("id" = uuid::Uuid, Path, description = "Item UUID"),
    ),
    request_body = ModerateItemRequest,
    responses(
        (status = 200, description = "Item status updated", body = ItemDto),
        (status = 400, description = "Invalid target status or swapped item", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn set_item_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<ModerateItemRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let item_id = ItemId::from_uuid(id);
    let _ = state
        .moderation
        .set_item_status(item_id, req.status, caller.user_id)
        .await?;
    let entry = state.catalog.get(item_id).await?;
    Ok(Json(ItemDto::from(entry)))
}

/// `DELETE /admin/items/{id}` — Hard-remove a listing.
///
/// Refused while pending requests reference the item.
///
/// # Errors
///
/// Returns [`GatewayError`] for non-admin callers, unknown items, or items
/// with pending requests.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/items/{id}",
    tag = "Moderation",
    summary = "Delete an item",
    params(
        ("id" = uuid::Uuid, Path, description = "Item UUID"),
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Pending requests reference the item", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .moderation
        .delete_item(ItemId::from_uuid(id), caller.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/stats` — Aggregate platform statistics.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] for non-admin callers.
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "Moderation",
    summary = "Platform statistics",
    responses(
        (status = 200, description = "Aggregate statistics", body = PlatformStats),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn platform_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, GatewayError> {
    let stats = state.moderation.platform_stats(caller.user_id).await?;
    Ok(Json(stats))
}

/// Moderation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/items/pending", get(pending_items))
        .route("/admin/items/{id}/status", put(set_item_status))
        .route("/admin/items/{id}", delete(delete_item))
        .route("/admin/stats", get(platform_stats))
}
