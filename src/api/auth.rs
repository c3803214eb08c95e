//! Caller identity extraction.
//!
//! Authentication itself (credentials, sessions) lives in an upstream auth
//! layer; by the time a request reaches the gateway its identity has been
//! established and is delivered as an `x-user-id` header. The [`Caller`]
//! extractor resolves that header against the registry so every handler
//! receives an explicit, verified caller identity to thread into the core
//! operations.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::domain::{UserId, UserRole};
use crate::error::GatewayError;

/// Header carrying the upstream-authenticated user ID.
pub const CALLER_HEADER: &str = "x-user-id";

/// Verified caller identity, extracted from the `x-user-id` header.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The authenticated user's role.
    pub role: UserRole,
}

impl Caller {
    /// Returns `true` if the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                GatewayError::Unauthorized(format!("missing {CALLER_HEADER} header"))
            })?;

        let uuid: uuid::Uuid = header.parse().map_err(|_| {
            GatewayError::Unauthorized(format!("malformed {CALLER_HEADER} header"))
        })?;
        let user_id = UserId::from_uuid(uuid);

        let user = state
            .accounts
            .get_user(user_id)
            .await
            .map_err(|_| GatewayError::Unauthorized("unknown caller identity".to_string()))?;

        Ok(Self {
            user_id,
            role: user.role,
        })
    }
}
