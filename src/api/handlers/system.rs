//! System endpoints: health check and catalog option enumeration.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Enumerated values accepted by the catalog filter fields.
#[derive(Debug, Serialize, ToSchema)]
struct CatalogOptions {
    categories: Vec<&'static str>,
    item_types: Vec<&'static str>,
    sizes: Vec<&'static str>,
    conditions: Vec<&'static str>,
}

/// `GET /config/catalog-options` — List valid catalog filter values.
///
/// Consumed by clients and by the natural-language search collaborator to
/// constrain its output to values the gateway will accept.
#[utoipa::path(
    get,
    path = "/config/catalog-options",
    tag = "System",
    summary = "List valid catalog filter values",
    responses(
        (status = 200, description = "Enumerated filter values", body = CatalogOptions),
    )
)]
pub async fn catalog_options_handler() -> impl IntoResponse {
    let options = CatalogOptions {
        categories: vec!["men", "women", "kids"],
        item_types: vec!["shirt", "pants", "dress", "jacket", "shoes", "accessories"],
        sizes: vec!["xs", "s", "m", "l", "xl", "xxl"],
        conditions: vec!["like-new", "excellent", "good", "fair"],
    };
    (StatusCode::OK, Json(options))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/catalog-options", get(catalog_options_handler))
}
