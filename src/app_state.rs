//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{AccountService, CatalogService, ExchangeService, ModerationService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Account registration and ledger reads.
    pub accounts: Arc<AccountService>,
    /// Catalog queries and item submission.
    pub catalog: Arc<CatalogService>,
    /// Request lifecycle and settlement.
    pub exchange: Arc<ExchangeService>,
    /// Admin moderation workflow.
    pub moderation: Arc<ModerationService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
