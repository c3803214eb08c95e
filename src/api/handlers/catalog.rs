//! Catalog endpoints: browse, search, item detail, and submission.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::Caller;
use crate::api::dto::{
    CatalogQueryParams, ItemDto, ItemListResponse, OwnedItemsParams, SubmitItemRequest, paginate,
};
use crate::app_state::AppState;
use crate::domain::ItemId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /items` — Browse the catalog with filters and search.
///
/// Without an explicit `status` filter only approved items are returned.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures; invalid enumerated filter
/// values are rejected during query deserialization.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "Catalog",
    summary = "Browse the catalog",
    description = "Returns a paginated item list, newest first, owners joined. Filters compose; `search` matches title or description case-insensitively.",
    params(CatalogQueryParams),
    responses(
        (status = 200, description = "Paginated item list", body = ItemListResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse),
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let listed = state.catalog.list(&params.to_item_query()).await;
    let (page_items, pagination) = paginate(listed, params.page, params.per_page);

    Ok(Json(ItemListResponse {
        data: page_items.into_iter().map(ItemDto::from).collect(),
        pagination,
    }))
}

/// `GET /items/{id}` — Item detail, any status.
///
/// # Errors
///
/// Returns [`GatewayError::ItemNotFound`] if the item does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "Catalog",
    summary = "Get item details",
    params(
        ("id" = uuid::Uuid, Path, description = "Item UUID"),
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDto),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let entry = state.catalog.get(ItemId::from_uuid(id)).await?;
    Ok(Json(ItemDto::from(entry)))
}

/// `POST /items` — Submit a new listing.
///
/// The caller becomes the owner; the listing starts `pending` until an
/// admin moderates it.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on payload validation failures.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "Catalog",
    summary = "Submit a new listing",
    request_body = SubmitItemRequest,
    responses(
        (status = 201, description = "Listing created, pending moderation", body = ItemDto),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn submit_item(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<SubmitItemRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let item = state.catalog.submit(caller.user_id, req.into()).await?;
    let entry = state.catalog.get(item.id).await?;
    Ok((StatusCode::CREATED, Json(ItemDto::from(entry))))
}

/// `GET /items/mine` — The caller's own listings, all statuses by default.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/items/mine",
    tag = "Catalog",
    summary = "List the caller's own items",
    params(OwnedItemsParams),
    responses(
        (status = 200, description = "Caller's items, newest first", body = [ItemDto]),
        (status = 403, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn my_items(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<OwnedItemsParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let owned = state
        .catalog
        .items_owned_by(caller.user_id, params.status)
        .await;
    let data: Vec<ItemDto> = owned.into_iter().map(ItemDto::from).collect();
    Ok(Json(data))
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(submit_item))
        .route("/items/mine", get(my_items))
        .route("/items/{id}", get(get_item))
}
