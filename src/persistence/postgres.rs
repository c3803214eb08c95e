//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::models::StoredEvent;
use crate::config::GatewayConfig;
use crate::domain::{ExchangeEvent, MarketSnapshot};
use crate::error::GatewayError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to PostgreSQL using the configured pool sizing and runs the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the connection or a
    /// migration fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(Self::new(pool))
    }

    /// Appends a domain event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_event(&self, event: &ExchangeEvent) -> Result<i64, GatewayError> {
        let payload = serde_json::to_value(event)
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        let item_id = event.item_id().map(|id| *id.as_uuid());

        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO exchange_events (item_id, event_type, payload) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(item_id)
        .bind(event.event_type_str())
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Saves a whole-state marketplace snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_snapshot(&self, snapshot: &MarketSnapshot) -> Result<i64, GatewayError> {
        let state_json = serde_json::to_value(snapshot)
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO market_snapshots (state_json) VALUES ($1) RETURNING id",
        )
        .bind(state_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Loads the most recent snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure or a
    /// snapshot payload that no longer deserializes.
    pub async fn load_latest_snapshot(&self) -> Result<Option<MarketSnapshot>, GatewayError> {
        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT state_json FROM market_snapshots ORDER BY snapshot_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        match row {
            Some((state_json,)) => {
                let snapshot = serde_json::from_value(state_json)
                    .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Loads events after the given timestamp, optionally filtered by item.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_events_after(
        &self,
        after: DateTime<Utc>,
        item_id: Option<Uuid>,
    ) -> Result<Vec<StoredEvent>, GatewayError> {
        let rows = if let Some(id) = item_id {
            sqlx::query_as::<_, (i64, Option<Uuid>, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, item_id, event_type, payload, created_at FROM exchange_events \
                 WHERE created_at > $1 AND item_id = $2 ORDER BY created_at ASC",
            )
            .bind(after)
            .bind(id)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, (i64, Option<Uuid>, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, item_id, event_type, payload, created_at FROM exchange_events \
                 WHERE created_at > $1 ORDER BY created_at ASC",
            )
            .bind(after)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, item_id, event_type, payload, created_at)| StoredEvent {
                id,
                item_id,
                event_type,
                payload,
                created_at,
            })
            .collect())
    }

    /// Deletes snapshots older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete_old_snapshots(&self, before_days: u64) -> Result<u64, GatewayError> {
        let cutoff =
            Utc::now() - chrono::Duration::days(i64::try_from(before_days).unwrap_or(i64::MAX));

        let result = sqlx::query("DELETE FROM market_snapshots WHERE snapshot_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
