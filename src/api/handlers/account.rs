//! Account endpoints: registration, profile, balance, and ledger history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Caller;
use crate::api::dto::{
    BalanceResponse, RegisterUserRequest, TransactionListResponse, UserResponse,
};
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /users` — Register a new user.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed payloads or duplicate emails.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Accounts",
    summary = "Register a new user",
    description = "Registers a user with an upstream-hashed credential. The account starts with the configured signup bonus, recorded as a bonus ledger entry.",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid payload or duplicate email", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let user = state.accounts.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `GET /users/{id}` — Fetch a user profile.
///
/// # Errors
///
/// Returns [`GatewayError::UserNotFound`] if no such user exists.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Accounts",
    summary = "Get a user profile",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 403, description = "Missing caller identity", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let user = state.accounts.get_user(UserId::from_uuid(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// `GET /users/{id}/balance` — Current point balance.
///
/// Only the user themselves or an admin may read a balance.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] for other callers and
/// [`GatewayError::UserNotFound`] for unknown users.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/balance",
    tag = "Accounts",
    summary = "Get a user's point balance",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 403, description = "Caller may not read this balance", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let user_id = UserId::from_uuid(id);
    require_self_or_admin(&caller, user_id)?;

    let balance = state.accounts.balance(user_id).await?;
    Ok(Json(BalanceResponse { user_id, balance }))
}

/// `GET /users/{id}/transactions` — Ledger history, newest first.
///
/// Only the user themselves or an admin may read a history.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] for other callers and
/// [`GatewayError::UserNotFound`] for unknown users.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/transactions",
    tag = "Accounts",
    summary = "Get a user's transaction history",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Ledger entries, newest first", body = TransactionListResponse),
        (status = 403, description = "Caller may not read this history", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_transactions(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let user_id = UserId::from_uuid(id);
    require_self_or_admin(&caller, user_id)?;

    let entries = state.accounts.transactions(user_id).await?;
    Ok(Json(TransactionListResponse {
        data: entries.into_iter().map(Into::into).collect(),
    }))
}

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/balance", get(get_balance))
        .route("/users/{id}/transactions", get(get_transactions))
}

/// Ledger reads are restricted to the account owner and admins.
fn require_self_or_admin(caller: &Caller, target: UserId) -> Result<(), GatewayError> {
    if caller.user_id == target || caller.is_admin() {
        Ok(())
    } else {
        Err(GatewayError::Unauthorized(
            "cannot access another user's ledger".to_string(),
        ))
    }
}
