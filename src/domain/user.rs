//! Registered users and their roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Role attached to a user account.
///
/// Admins gate the moderation workflow; every other operation is available
/// to ordinary users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Ordinary marketplace participant.
    User,
    /// Administrator with moderation privileges.
    Admin,
}

/// A registered marketplace user.
///
/// The point `balance` is owned by the settlement logic: it only changes
/// through the registry's debit/credit primitives, each paired with an
/// appended ledger entry, so it always equals the sum of the user's
/// [`super::PointTransaction`] amounts. Users are never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (immutable after registration).
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// Opaque credential hash produced by the upstream auth layer.
    pub password_hash: String,
    /// Display name shown alongside listings.
    pub display_name: String,
    /// Account role.
    pub role: UserRole,
    /// Current point balance. Never negative.
    pub balance: i64,
    /// Optional profile image URI (opaque to the gateway).
    pub profile_image: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns `true` if the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
