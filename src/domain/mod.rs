//! Domain layer: core marketplace model, shared state, and event system.
//!
//! This module contains the server-side domain model: entity identifiers,
//! users, items, exchange requests, the append-only point ledger, the event
//! bus for broadcasting state changes, and the registry holding the shared
//! marketplace state behind a single writer lock.

pub mod event;
pub mod event_bus;
pub mod ids;
pub mod item;
pub mod ledger;
pub mod registry;
pub mod request;
pub mod user;

pub use event::ExchangeEvent;
pub use event_bus::EventBus;
pub use ids::{ItemId, RequestId, TransactionId, UserId};
pub use item::{Category, Condition, Item, ItemQuery, ItemStatus, ItemType, Size};
pub use ledger::{PointTransaction, TransactionKind};
pub use registry::{ExchangeRegistry, ExchangeState, MarketSnapshot};
pub use request::{ExchangeRequest, RequestKind, RequestStatus};
pub use user::{User, UserRole};
