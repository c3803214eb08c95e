//! Persistence layer: PostgreSQL event log and marketplace snapshots.
//!
//! Durable storage for domain events and periodic whole-state snapshots.
//! The concrete implementation uses `sqlx::PgPool` for async PostgreSQL
//! access; the latest snapshot is restored into the registry at startup.

pub mod models;
pub mod postgres;

pub use postgres::PostgresPersistence;
