//! End-to-end behavior of `GET /chat/summary` through the layered router.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use summary_aggregator::config::AggregatorConfig;
use summary_aggregator::upstream::{CallBehavior, ContextModes};
use summary_aggregator::HttpServer;

mod common;

use common::{aggregator, get, ms, router, send};

#[tokio::test(start_paused = true)]
async fn test_success_path() {
    let agg = aggregator(ms(10), ms(50), ms(100));

    let reply = get(router(agg.clone()), "/chat/summary").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.content_type.starts_with("application/json"));
    assert_eq!(
        reply.json(),
        json!({
            "user": { "id": "123", "name": "Name" },
            "permissions": { "allowed": true },
            "context": { "summary": "some chat info" }
        })
    );
    assert_eq!(agg.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_optional_failure_degrades() {
    let agg = aggregator(ms(10), ms(50), CallBehavior::fail("vector memory failed"));

    let reply = get(router(agg.clone()), "/chat/summary").await;

    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert!(body.get("context").is_none());
    assert_eq!(body["user"]["id"], "123");
    assert_eq!(body["permissions"]["allowed"], true);
    assert!(!reply.body.contains("vector memory failed"));
    assert_eq!(agg.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_identity_failure_is_fatal() {
    let agg = aggregator(CallBehavior::fail("directory offline"), ms(50), ms(100));

    let reply = get(router(agg.clone()), "/chat/summary").await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply.content_type.starts_with("text/plain"));
    assert_eq!(reply.body, "user service failed");
    assert!(!reply.body.contains("allowed"));
    assert!(!reply.body.contains("summary"));
    assert_eq!(agg.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_permissions_timeout_is_fatal() {
    let agg = aggregator(ms(10), ms(500), ms(100));

    let reply = get(router(agg.clone()), "/chat/summary").await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body, "timeout on permissions service");
    assert_eq!(agg.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_every_abort_message() {
    let cases = [
        (aggregator(CallBehavior::fail("x"), ms(50), ms(100)), "user service failed"),
        (aggregator(ms(900), ms(50), ms(100)), "timeout on user service"),
        (aggregator(ms(10), CallBehavior::fail("x"), ms(100)), "permissions service failed"),
        (aggregator(ms(10), ms(900), ms(100)), "timeout on permissions service"),
    ];

    for (agg, message) in cases {
        let reply = get(router(agg.clone()), "/chat/summary").await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.body, message);
        assert_eq!(agg.in_flight(), 0, "{message}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_context_latency_only_toggles_context() {
    for latency in [0, 50, 120, 199, 201, 400] {
        let agg = aggregator(ms(10), ms(50), ms(latency));
        let reply = get(router(agg.clone()), "/chat/summary").await;

        assert_eq!(reply.status, StatusCode::OK, "latency {latency}ms");
        let body = reply.json();
        assert_eq!(body["user"], json!({ "id": "123", "name": "Name" }));
        assert_eq!(body["permissions"], json!({ "allowed": true }));
        assert_eq!(body.get("context").is_some(), latency < 200, "latency {latency}ms");
        assert_eq!(agg.in_flight(), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_injected_context_modes_are_reproducible() {
    let modes = ContextModes::default();

    for _ in 0..3 {
        let full = get(router(aggregator(ms(10), ms(50), modes.fast())), "/chat/summary").await;
        assert_eq!(full.json()["context"]["summary"], "some chat info");

        let slow = get(router(aggregator(ms(10), ms(50), modes.slow())), "/chat/summary").await;
        assert_eq!(slow.status, StatusCode::OK);
        assert!(slow.json().get("context").is_none());

        let broken = get(router(aggregator(ms(10), ms(50), modes.failure())), "/chat/summary").await;
        assert_eq!(broken.status, StatusCode::OK);
        assert!(broken.json().get("context").is_none());
    }
}

#[tokio::test(start_paused = true)]
async fn test_seeded_config_always_answers_200() {
    let mut config = AggregatorConfig::default();
    config.upstreams.context.seed = Some(1234);
    let server = HttpServer::new(config);

    for _ in 0..12 {
        let reply = get(server.router(), "/chat/summary").await;
        assert_eq!(reply.status, StatusCode::OK);
        let body = reply.json();
        assert_eq!(body["user"]["name"], "Name");
        assert_eq!(body["permissions"]["allowed"], true);
    }
    assert_eq!(server.aggregator().in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_configured_budget_is_applied() {
    let mut config = AggregatorConfig::default();
    config.deadline.budget_ms = 30;
    let server = HttpServer::new(config);

    // Default access latency is 50ms, beyond a 30ms budget.
    let reply = get(server.router(), "/chat/summary").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body, "timeout on permissions service");
    assert_eq!(server.aggregator().budget(), Duration::from_millis(30));
}

#[tokio::test(start_paused = true)]
async fn test_request_id_generated_and_propagated() {
    let generated = get(router(aggregator(ms(10), ms(50), ms(100))), "/chat/summary").await;
    let id = generated.request_id.expect("request id should be set");
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let request = Request::get("/chat/summary")
        .header("x-request-id", "client-supplied-1")
        .body(Body::empty())
        .unwrap();
    let echoed = send(router(aggregator(ms(10), ms(50), ms(100))), request).await;
    assert_eq!(echoed.request_id.as_deref(), Some("client-supplied-1"));
}

#[tokio::test(start_paused = true)]
async fn test_only_get_is_routed() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/chat/summary")
        .body(Body::empty())
        .unwrap();
    let reply = send(router(aggregator(ms(10), ms(50), ms(100))), request).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);

    let reply = get(router(aggregator(ms(10), ms(50), ms(100))), "/chat/other").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let reply = get(router(aggregator(ms(10), ms(50), ms(100))), "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "ok");
}
