//! End-to-end tests driving the full router in-process.
//!
//! Requests go through the real Axum router via `tower::ServiceExt::oneshot`,
//! so routing, extractors, caller identity, and error mapping are all
//! exercised without a network listener.

#![allow(clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use threadswap_gateway::api;
use threadswap_gateway::app_state::AppState;
use threadswap_gateway::domain::{EventBus, ExchangeRegistry};
use threadswap_gateway::service::{
    AccountService, CatalogService, ExchangeService, ModerationService,
};

const SIGNUP_BONUS: i64 = 100;

fn make_app() -> Router {
    let registry = Arc::new(ExchangeRegistry::new());
    let event_bus = EventBus::new(1000);
    let state = AppState {
        accounts: Arc::new(AccountService::new(
            Arc::clone(&registry),
            event_bus.clone(),
            SIGNUP_BONUS,
        )),
        catalog: Arc::new(CatalogService::new(
            Arc::clone(&registry),
            event_bus.clone(),
        )),
        exchange: Arc::new(ExchangeService::new(
            Arc::clone(&registry),
            event_bus.clone(),
        )),
        moderation: Arc::new(ModerationService::new(
            Arc::clone(&registry),
            event_bus.clone(),
        )),
        event_bus,
    };
    api::build_router().with_state(state)
}

fn request(method: &str, uri: &str, caller: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = caller {
        builder = builder.header("x-user-id", id);
    }
    let request = if let Some(value) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
    } else {
        builder.body(Body::empty())
    };
    let Ok(request) = request else {
        panic!("request build failed");
    };
    request
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let Ok(response) = app.clone().oneshot(req).await else {
        panic!("request failed");
    };
    let status = response.status();
    let Ok(collected) = response.into_body().collect().await else {
        panic!("body read failed");
    };
    let bytes = collected.to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn register(app: &Router, email: &str, role: &str) -> String {
    let payload = json!({
        "email": email,
        "password_hash": "argon2-opaque",
        "display_name": "Test User",
        "role": role,
    });
    let (status, body) = send(app, request("POST", "/api/v1/users", None, Some(&payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(id) = body.get("id").and_then(|v| v.as_str()) else {
        panic!("missing user id in response");
    };
    id.to_string()
}

async fn submit_and_approve_item(app: &Router, owner: &str, admin: &str, points: i64) -> String {
    let payload = json!({
        "title": "Denim jacket",
        "description": "Classic blue denim",
        "category": "women",
        "item_type": "jacket",
        "size": "m",
        "condition": "like-new",
        "tags": ["vintage", "denim"],
        "images": ["blob://img-1"],
        "points": points,
    });
    let (status, body) = send(
        app,
        request("POST", "/api/v1/items", Some(owner), Some(&payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(item_id) = body.get("id").and_then(|v| v.as_str()) else {
        panic!("missing item id in response");
    };
    let item_id = item_id.to_string();

    let (status, body) = send(
        app,
        request(
            "PUT",
            &format!("/api/v1/admin/items/{item_id}/status"),
            Some(admin),
            Some(&json!({"status": "approved"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("approved"));

    item_id
}

async fn balance_of(app: &Router, caller: &str, user: &str) -> i64 {
    let (status, body) = send(
        app,
        request(
            "GET",
            &format!("/api/v1/users/{user}/balance"),
            Some(caller),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let Some(balance) = body.get("balance").and_then(|v| v.as_i64()) else {
        panic!("missing balance in response");
    };
    balance
}

#[tokio::test]
async fn health_and_catalog_options_are_public() {
    let app = make_app();

    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("healthy"));

    let (status, body) = send(&app, request("GET", "/config/catalog-options", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body.get("sizes")
            .and_then(|v| v.as_array())
            .is_some_and(|sizes| sizes.len() == 6)
    );
}

#[tokio::test]
async fn points_redemption_flow_end_to_end() {
    let app = make_app();
    let owner = register(&app, "owner@example.com", "user").await;
    let requester = register(&app, "requester@example.com", "user").await;
    let admin = register(&app, "admin@example.com", "admin").await;

    let item_id = submit_and_approve_item(&app, &owner, &admin, 40).await;

    // The approved item is in the public catalog, findable by search.
    let (status, body) = send(
        &app,
        request("GET", "/api/v1/items?search=denim", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body.get("data")
            .and_then(|v| v.as_array())
            .is_some_and(|data| data.len() == 1)
    );

    // Requester offers 40 points.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/requests",
            Some(&requester),
            Some(&json!({"item_id": item_id, "kind": "points", "amount": 40})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(request_id) = body.get("id").and_then(|v| v.as_str()) else {
        panic!("missing request id in response");
    };
    let request_id = request_id.to_string();

    // The owner sees it in the incoming view and approves.
    let (status, body) = send(
        &app,
        request("GET", "/api/v1/requests/incoming", Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body.get("data")
            .and_then(|v| v.as_array())
            .is_some_and(|data| data.len() == 1)
    );

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/requests/{request_id}/approve"),
            Some(&owner),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("approved"));

    // Balances moved exactly once; the item left the catalog as swapped.
    assert_eq!(balance_of(&app, &requester, &requester).await, SIGNUP_BONUS - 40);
    assert_eq!(balance_of(&app, &owner, &owner).await, SIGNUP_BONUS + 40);

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/v1/items/{item_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("swapped"));

    // Settlement wrote a debit and a credit referencing the request.
    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/api/v1/users/{requester}/transactions"),
            Some(&requester),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let Some(entries) = body.get("data").and_then(|v| v.as_array()) else {
        panic!("missing transaction data");
    };
    assert!(
        entries
            .iter()
            .any(|entry| entry.get("amount").and_then(|v| v.as_i64()) == Some(-40)
                && entry.get("related_request").and_then(|v| v.as_str())
                    == Some(request_id.as_str()))
    );

    // A second approval conflicts and changes nothing.
    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/requests/{request_id}/approve"),
            Some(&owner),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body.pointer("/error/code").and_then(|v| v.as_u64()),
        Some(4001)
    );
    assert_eq!(balance_of(&app, &owner, &owner).await, SIGNUP_BONUS + 40);
}

#[tokio::test]
async fn authorization_is_enforced_at_every_boundary() {
    let app = make_app();
    let owner = register(&app, "owner@example.com", "user").await;
    let requester = register(&app, "requester@example.com", "user").await;
    let admin = register(&app, "admin@example.com", "admin").await;

    let item_id = submit_and_approve_item(&app, &owner, &admin, 40).await;

    // Missing caller identity.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/requests",
            None,
            Some(&json!({"item_id": item_id, "kind": "swap"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Non-admins cannot moderate.
    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/admin/items/{item_id}/status"),
            Some(&requester),
            Some(&json!({"status": "rejected"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only the recorded owner may approve.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/requests",
            Some(&requester),
            Some(&json!({"item_id": item_id, "kind": "swap"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(request_id) = body.get("id").and_then(|v| v.as_str()) else {
        panic!("missing request id in response");
    };

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/requests/{request_id}/approve"),
            Some(&requester),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Ledger reads are self-or-admin.
    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/api/v1/users/{owner}/balance"),
            Some(&requester),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(balance_of(&app, &admin, &owner).await, SIGNUP_BONUS);
}

#[tokio::test]
async fn uncovered_points_offer_is_rejected_at_create() {
    let app = make_app();
    let owner = register(&app, "owner@example.com", "user").await;
    let requester = register(&app, "requester@example.com", "user").await;
    let admin = register(&app, "admin@example.com", "admin").await;

    let item_id = submit_and_approve_item(&app, &owner, &admin, 500).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/requests",
            Some(&requester),
            Some(&json!({"item_id": item_id, "kind": "points", "amount": 500})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body.pointer("/error/code").and_then(|v| v.as_u64()),
        Some(4002)
    );
}

#[tokio::test]
async fn pending_items_are_hidden_until_moderated() {
    let app = make_app();
    let owner = register(&app, "owner@example.com", "user").await;

    let payload = json!({
        "title": "Wool coat",
        "description": "Winter warmth",
        "category": "women",
        "item_type": "jacket",
        "size": "s",
        "condition": "excellent",
        "points": 50,
    });
    let (status, _) = send(
        &app,
        request("POST", "/api/v1/items", Some(&owner), Some(&payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Public catalog stays empty; the owner view shows the pending item.
    let (status, body) = send(&app, request("GET", "/api/v1/items", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body.get("data")
            .and_then(|v| v.as_array())
            .is_some_and(|data| data.is_empty())
    );

    let (status, body) = send(
        &app,
        request("GET", "/api/v1/items/mine", Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().is_some_and(|data| data.len() == 1));
}

#[tokio::test]
async fn invalid_filter_values_are_rejected() {
    let app = make_app();

    let (status, _) = send(
        &app,
        request("GET", "/api/v1/items?category=spacesuits", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_stats_reflect_activity() {
    let app = make_app();
    let owner = register(&app, "owner@example.com", "user").await;
    let requester = register(&app, "requester@example.com", "user").await;
    let admin = register(&app, "admin@example.com", "admin").await;

    let item_id = submit_and_approve_item(&app, &owner, &admin, 40).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/requests",
            Some(&requester),
            Some(&json!({"item_id": item_id, "kind": "points", "amount": 40})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(request_id) = body.get("id").and_then(|v| v.as_str()) else {
        panic!("missing request id in response");
    };

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/requests/{request_id}/approve"),
            Some(&owner),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request("GET", "/api/v1/admin/stats", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("total_users").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(body.get("total_items").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(body.get("settled_requests").and_then(|v| v.as_u64()), Some(1));
    // Settlement conserves points: three signup bonuses, nothing minted.
    assert_eq!(
        body.get("points_in_circulation").and_then(|v| v.as_i64()),
        Some(3 * SIGNUP_BONUS)
    );
}
