//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ItemId, RequestId, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4002,
///     "message": "insufficient points: required 40, available 10",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation/Auth | 400 Bad Request / 403      |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server          | 500 Internal Server Error  |
/// | 4000–4999 | Settlement      | 409 Conflict / 422         |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No user with the given ID exists.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No item with the given ID exists.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// No exchange request with the given ID exists.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Caller lacks the role or ownership required for the action.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The exchange request already reached a terminal state; settlement
    /// cannot be applied a second time.
    #[error("request {0} is no longer pending")]
    AlreadySettled(RequestId),

    /// Requester's balance cannot cover the points settlement.
    #[error("insufficient points: required {required}, available {available}")]
    InsufficientPoints {
        /// Points the settlement requires.
        required: i64,
        /// Points the requester actually holds.
        available: i64,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Unauthorized(_) => 1003,
            Self::UserNotFound(_) => 2001,
            Self::ItemNotFound(_) => 2002,
            Self::RequestNotFound(_) => 2003,
            Self::AlreadySettled(_) => 4001,
            Self::InsufficientPoints { .. } => 4002,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::UserNotFound(_) | Self::ItemNotFound(_) | Self::RequestNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::AlreadySettled(_) => StatusCode::CONFLICT,
            Self::InsufficientPoints { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
