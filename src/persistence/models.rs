//! Database models for events and snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored event row from the `exchange_events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Item the event concerns, when it concerns one.
    pub item_id: Option<Uuid>,
    /// Event type discriminator (e.g. `"request_settled"`).
    pub event_type: String,
    /// JSONB payload with event-specific data.
    pub payload: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A snapshot row from the `market_snapshots` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Full marketplace state as JSONB.
    pub state_json: serde_json::Value,
    /// Snapshot timestamp.
    pub snapshot_at: DateTime<Utc>,
}
