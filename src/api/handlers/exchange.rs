//! Exchange request endpoints: create, views, approve, reject.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Caller;
use crate::api::dto::{CreateRequestRequest, RequestDto, RequestListResponse};
use crate::app_state::AppState;
use crate::domain::RequestId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /requests` — Create an exchange request as the caller.
///
/// # Errors
///
/// Returns [`GatewayError`] when the item is missing or unavailable, the
/// caller owns it, or a points offer is non-positive or uncovered.
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    tag = "Exchange",
    summary = "Create an exchange request",
    description = "Asks to acquire an approved item by direct swap (optionally offering one of the caller's items) or points redemption.",
    request_body = CreateRequestRequest,
    responses(
        (status = 201, description = "Request created, pending the owner's decision", body = RequestDto),
        (status = 400, description = "Precondition violated", body = ErrorResponse),
        (status = 403, description = "Missing caller identity", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Offer exceeds the caller's balance", body = ErrorResponse),
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateRequestRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let request = state
        .exchange
        .create_request(caller.user_id, req.item_id, req.kind)
        .await?;
    Ok((StatusCode::CREATED, Json(RequestDto::from(request))))
}

/// `GET /requests/incoming` — Requests addressed to the caller's items.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/requests/incoming",
    tag = "Exchange",
    summary = "List incoming requests",
    responses(
        (status = 200, description = "Requests awaiting the caller's decision, newest first", body = RequestListResponse),
        (status = 403, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn incoming_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, GatewayError> {
    let requests = state.exchange.requests_for_owner(caller.user_id).await;
    Ok(Json(RequestListResponse {
        data: requests.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /requests/outgoing` — Requests the caller has created.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/requests/outgoing",
    tag = "Exchange",
    summary = "List outgoing requests",
    responses(
        (status = 200, description = "Requests created by the caller, newest first", body = RequestListResponse),
        (status = 403, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn outgoing_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, GatewayError> {
    let requests = state.exchange.requests_for_requester(caller.user_id).await;
    Ok(Json(RequestListResponse {
        data: requests.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /requests/{id}/approve` — Approve and settle a pending request.
///
/// Only the recorded item owner may approve. Settlement is atomic and
/// applied at most once; a repeated approval returns `409`.
///
/// # Errors
///
/// Returns [`GatewayError`] on unknown requests, non-owners, settled
/// requests, moved/unavailable items, or uncovered points offers.
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/approve",
    tag = "Exchange",
    summary = "Approve a request",
    params(
        ("id" = uuid::Uuid, Path, description = "Request UUID"),
    ),
    responses(
        (status = 200, description = "Request settled", body = RequestDto),
        (status = 400, description = "Item moved or no longer available", body = ErrorResponse),
        (status = 403, description = "Caller is not the recorded owner", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already settled", body = ErrorResponse),
        (status = 422, description = "Requester can no longer cover the offer", body = ErrorResponse),
    )
)]
pub async fn approve_request(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let request = state
        .exchange
        .approve_request(RequestId::from_uuid(id), caller.user_id)
        .await?;
    Ok(Json(RequestDto::from(request)))
}

/// `POST /requests/{id}/reject` — Reject a pending request.
///
/// # Errors
///
/// Returns [`GatewayError`] on unknown requests, non-owners, or settled
/// requests.
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/reject",
    tag = "Exchange",
    summary = "Reject a request",
    params(
        ("id" = uuid::Uuid, Path, description = "Request UUID"),
    ),
    responses(
        (status = 200, description = "Request rejected", body = RequestDto),
        (status = 403, description = "Caller is not the recorded owner", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already settled", body = ErrorResponse),
    )
)]
pub async fn reject_request(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let request = state
        .exchange
        .reject_request(RequestId::from_uuid(id), caller.user_id)
        .await?;
    Ok(Json(RequestDto::from(request)))
}

/// Exchange routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", post(create_request))
        .route("/requests/incoming", get(incoming_requests))
        .route("/requests/outgoing", get(outgoing_requests))
        .route("/requests/{id}/approve", post(approve_request))
        .route("/requests/{id}/reject", post(reject_request))
}
