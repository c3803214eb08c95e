//! Account and ledger DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    PointTransaction, RequestId, TransactionId, TransactionKind, User, UserId, UserRole,
};
use crate::service::NewUser;

/// Request body for `POST /users`.
///
/// The credential hash arrives opaque from the upstream auth layer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    /// Unique email address.
    pub email: String,
    /// Opaque credential hash.
    pub password_hash: String,
    /// Display name.
    pub display_name: String,
    /// Account role. Defaults to `user`.
    #[serde(default = "default_role")]
    pub role: UserRole,
    /// Optional profile image URI.
    #[serde(default)]
    pub profile_image: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::User
}

impl From<RegisterUserRequest> for NewUser {
    fn from(req: RegisterUserRequest) -> Self {
        Self {
            email: req.email,
            password_hash: req.password_hash,
            display_name: req.display_name,
            role: req.role,
            profile_image: req.profile_image,
        }
    }
}

/// Public user representation. Never carries the credential hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// User identifier.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Account role.
    pub role: UserRole,
    /// Current point balance.
    pub balance: i64,
    /// Optional profile image URI.
    pub profile_image: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            balance: user.balance,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

/// Response body for `GET /users/{id}/balance`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// User the balance belongs to.
    pub user_id: UserId,
    /// Current point balance.
    pub balance: i64,
}

/// One ledger entry in a transaction history response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionDto {
    /// Transaction identifier.
    pub id: TransactionId,
    /// Signed amount: positive credit, negative debit.
    pub amount: i64,
    /// Entry classification.
    pub kind: TransactionKind,
    /// Human-readable description.
    pub description: String,
    /// Settlement request that produced the entry, if any.
    pub related_request: Option<RequestId>,
    /// Entry timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<PointTransaction> for TransactionDto {
    fn from(entry: PointTransaction) -> Self {
        Self {
            id: entry.id,
            amount: entry.amount,
            kind: entry.kind,
            description: entry.description,
            related_request: entry.related_request,
            created_at: entry.created_at,
        }
    }
}

/// Response body for `GET /users/{id}/transactions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    /// Ledger entries, newest first.
    pub data: Vec<TransactionDto>,
}
