//! # threadswap-gateway
//!
//! REST API and WebSocket gateway for the ThreadSwap clothing exchange
//! marketplace.
//!
//! Users list garments, browse others' listings, and acquire items either
//! through direct swaps or a points-based redemption economy; admins
//! moderate listings and read platform statistics. The settlement core —
//! atomic ownership and point transfer with an auditable ledger — lives in
//! the service layer over a single-writer state registry.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Event Feed (ws/)
//!     │
//!     ├── Account / Catalog / Exchange / Moderation services (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── ExchangeRegistry — users, items, requests, ledger (domain/)
//!     │
//!     └── PostgreSQL Persistence — event log + snapshots (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
