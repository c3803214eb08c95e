//! User accounts: registration, balance, and transaction history.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    EventBus, ExchangeEvent, ExchangeRegistry, PointTransaction, TransactionKind, User, UserId,
    UserRole,
};
use crate::error::GatewayError;

/// Registration payload. The credential hash arrives opaque from the
/// upstream auth layer; the gateway never sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique email address.
    pub email: String,
    /// Opaque credential hash.
    pub password_hash: String,
    /// Display name.
    pub display_name: String,
    /// Account role.
    pub role: UserRole,
    /// Optional profile image URI.
    pub profile_image: Option<String>,
}

/// Account registration plus ledger reads (balance, history).
#[derive(Debug, Clone)]
pub struct AccountService {
    registry: Arc<ExchangeRegistry>,
    event_bus: EventBus,
    signup_bonus: i64,
}

impl AccountService {
    /// Creates a new `AccountService` granting `signup_bonus` points to
    /// every new account.
    #[must_use]
    pub fn new(registry: Arc<ExchangeRegistry>, event_bus: EventBus, signup_bonus: i64) -> Self {
        Self {
            registry,
            event_bus,
            signup_bonus,
        }
    }

    /// Registers a new user.
    ///
    /// The starting balance equals the configured signup bonus and is
    /// recorded as a `bonus` ledger entry, so the balance-equals-ledger-sum
    /// invariant holds from the first moment of the account's life.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty email/display
    /// name or an already-registered email.
    pub async fn register(&self, new_user: NewUser) -> Result<User, GatewayError> {
        if new_user.email.trim().is_empty() || !new_user.email.contains('@') {
            return Err(GatewayError::InvalidRequest(
                "a valid email address is required".to_string(),
            ));
        }
        if new_user.display_name.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "display name must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            role: new_user.role,
            balance: self.signup_bonus,
            profile_image: new_user.profile_image,
            created_at: now,
            updated_at: now,
        };
        let created = user.clone();

        let mut state = self.registry.write().await;
        let _ = state.insert_user(user)?;
        if self.signup_bonus > 0 {
            state.append_transaction(PointTransaction::new(
                created.id,
                self.signup_bonus,
                TransactionKind::Bonus,
                "Signup bonus".to_string(),
                None,
            ));
        }
        drop(state);

        let _ = self.event_bus.publish(ExchangeEvent::UserRegistered {
            user_id: created.id,
            signup_bonus: self.signup_bonus,
            timestamp: now,
        });

        tracing::info!(user_id = %created.id, "user registered");
        Ok(created)
    }

    /// Returns the user with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if no such user exists.
    pub async fn get_user(&self, id: UserId) -> Result<User, GatewayError> {
        self.registry.read().await.user(id).cloned()
    }

    /// Returns the user's current point balance.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if no such user exists.
    pub async fn balance(&self, id: UserId) -> Result<i64, GatewayError> {
        self.registry.read().await.balance(id)
    }

    /// Returns the user's ledger history, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if no such user exists.
    pub async fn transactions(&self, id: UserId) -> Result<Vec<PointTransaction>, GatewayError> {
        let state = self.registry.read().await;
        let _ = state.user(id)?;
        Ok(state.transactions_for(id))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_service(signup_bonus: i64) -> AccountService {
        let registry = Arc::new(ExchangeRegistry::new());
        let event_bus = EventBus::new(1000);
        AccountService::new(registry, event_bus, signup_bonus)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "opaque".to_string(),
            display_name: "Ada".to_string(),
            role: UserRole::User,
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn registration_grants_bonus_and_records_ledger_entry() {
        let service = make_service(100);

        let Ok(user) = service.register(new_user("ada@example.com")).await else {
            panic!("register failed");
        };
        assert_eq!(user.balance, 100);

        let Ok(balance) = service.balance(user.id).await else {
            panic!("balance failed");
        };
        assert_eq!(balance, 100);

        let Ok(history) = service.transactions(user.id).await else {
            panic!("history failed");
        };
        assert_eq!(history.len(), 1);
        let total: i64 = history.iter().map(|t| t.amount).sum();
        assert_eq!(total, balance);
    }

    #[tokio::test]
    async fn zero_bonus_writes_no_ledger_entry() {
        let service = make_service(0);

        let Ok(user) = service.register(new_user("ada@example.com")).await else {
            panic!("register failed");
        };
        let Ok(history) = service.transactions(user.id).await else {
            panic!("history failed");
        };
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let service = make_service(100);

        let Ok(_) = service.register(new_user("ada@example.com")).await else {
            panic!("register failed");
        };
        let result = service.register(new_user("Ada@Example.com")).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn malformed_registration_is_rejected() {
        let service = make_service(100);

        let result = service.register(new_user("not-an-email")).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));

        let mut nameless = new_user("ada@example.com");
        nameless.display_name = "  ".to_string();
        assert!(matches!(
            service.register(nameless).await,
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn unknown_user_reads_fail() {
        let service = make_service(100);
        let ghost = UserId::new();

        assert!(matches!(
            service.get_user(ghost).await,
            Err(GatewayError::UserNotFound(_))
        ));
        assert!(matches!(
            service.balance(ghost).await,
            Err(GatewayError::UserNotFound(_))
        ));
        assert!(matches!(
            service.transactions(ghost).await,
            Err(GatewayError::UserNotFound(_))
        ));
    }
}
