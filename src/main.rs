//! threadswap-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints, restores
//! the latest marketplace snapshot, and spawns the persistence background
//! tasks (event-log writer, periodic snapshotter).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use threadswap_gateway::api;
use threadswap_gateway::app_state::AppState;
use threadswap_gateway::config::GatewayConfig;
use threadswap_gateway::domain::{EventBus, ExchangeRegistry};
use threadswap_gateway::persistence::PostgresPersistence;
use threadswap_gateway::service::{
    AccountService, CatalogService, ExchangeService, ModerationService,
};
use threadswap_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting threadswap-gateway");

    // Build domain layer
    let registry = Arc::new(ExchangeRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Wire persistence: restore the newest snapshot, then keep the event
    // log and snapshot tables fed in the background.
    if config.persistence_enabled {
        let persistence = PostgresPersistence::connect(&config)
            .await
            .context("persistence connection failed")?;

        if let Some(snapshot) = persistence
            .load_latest_snapshot()
            .await
            .context("snapshot restore failed")?
        {
            tracing::info!(
                users = snapshot.users.len(),
                items = snapshot.items.len(),
                requests = snapshot.requests.len(),
                "restoring marketplace snapshot"
            );
            registry.restore(snapshot).await;
        }

        if config.event_log_enabled {
            spawn_event_log_writer(persistence.clone(), &event_bus);
        }
        spawn_snapshotter(persistence, Arc::clone(&registry), &config);
    } else {
        tracing::warn!("persistence disabled; marketplace state is in-memory only");
    }

    // Build service layer
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&registry),
        event_bus.clone(),
        config.signup_bonus_points,
    ));
    let catalog = Arc::new(CatalogService::new(
        Arc::clone(&registry),
        event_bus.clone(),
    ));
    let exchange = Arc::new(ExchangeService::new(
        Arc::clone(&registry),
        event_bus.clone(),
    ));
    let moderation = Arc::new(ModerationService::new(
        Arc::clone(&registry),
        event_bus.clone(),
    ));

    // Build application state
    let app_state = AppState {
        accounts,
        catalog,
        exchange,
        moderation,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .context("bind failed")?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Subscribes to the event bus and appends every event to the durable log.
fn spawn_event_log_writer(persistence: PostgresPersistence, event_bus: &EventBus) {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = persistence.save_event(&event).await {
                        tracing::warn!(error = %e, "event log append failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "event log writer lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Periodically snapshots the full marketplace state and prunes old rows.
fn spawn_snapshotter(
    persistence: PostgresPersistence,
    registry: Arc<ExchangeRegistry>,
    config: &GatewayConfig,
) {
    let interval_secs = config.snapshot_interval_secs.max(1);
    let cleanup_after_days = config.cleanup_after_days;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately; skip it so the initial
        // snapshot lands one full interval after startup.
        interval.tick().await;
        loop {
            interval.tick().await;
            let snapshot = registry.snapshot().await;
            if let Err(e) = persistence.save_snapshot(&snapshot).await {
                tracing::warn!(error = %e, "snapshot persist failed");
            }
            if cleanup_after_days > 0 {
                if let Err(e) = persistence.delete_old_snapshots(cleanup_after_days).await {
                    tracing::warn!(error = %e, "snapshot cleanup failed");
                }
            }
        }
    });
}
