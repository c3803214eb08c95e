//! Service layer: business logic orchestration.
//!
//! Each service coordinates one slice of the marketplace over the shared
//! [`crate::domain::ExchangeRegistry`] and emits events through the
//! [`crate::domain::EventBus`]. [`ExchangeService`] owns the settlement
//! core; the others cover accounts, the catalog, and moderation.

pub mod account_service;
pub mod catalog_service;
pub mod exchange_service;
pub mod moderation_service;

pub use account_service::{AccountService, NewUser};
pub use catalog_service::{CatalogService, ItemWithOwner, NewItem};
pub use exchange_service::ExchangeService;
pub use moderation_service::{ModerationService, PlatformStats};
