//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use summary_aggregator::config::AggregatorConfig;
use summary_aggregator::upstream::{
    AccessDecision, AccessService, BehaviorSelector, CallBehavior, ContextService, FixedBehavior,
    Identity, IdentityService, SupplementalContext,
};
use summary_aggregator::{Aggregator, HttpServer, Shutdown};

pub const BUDGET: Duration = Duration::from_millis(200);

pub fn ms(n: u64) -> CallBehavior {
    CallBehavior::succeed_after(Duration::from_millis(n))
}

fn fixed(behavior: CallBehavior) -> Arc<dyn BehaviorSelector> {
    Arc::new(FixedBehavior(behavior))
}

/// Aggregator with each upstream pinned to one behavior.
pub fn aggregator(identity: CallBehavior, access: CallBehavior, context: CallBehavior) -> Aggregator {
    aggregator_with_budget(identity, access, context, BUDGET)
}

pub fn aggregator_with_budget(
    identity: CallBehavior,
    access: CallBehavior,
    context: CallBehavior,
    budget: Duration,
) -> Aggregator {
    Aggregator::new(
        Arc::new(IdentityService::new(
            Identity {
                id: "123".into(),
                name: "Name".into(),
            },
            fixed(identity),
        )),
        Arc::new(AccessService::new(AccessDecision { allowed: true }, fixed(access))),
        Arc::new(ContextService::new(
            SupplementalContext {
                summary: "some chat info".into(),
            },
            fixed(context),
        )),
        budget,
    )
}

/// Fully layered router around `aggregator`, with default server settings.
pub fn router(aggregator: Aggregator) -> Router {
    HttpServer::with_aggregator(AggregatorConfig::default(), aggregator).router()
}

/// A finished in-memory request.
pub struct Reply {
    pub status: StatusCode,
    pub content_type: String,
    pub request_id: Option<String>,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("body should be JSON")
    }
}

/// Send one request through `router` without a socket.
pub async fn send(router: Router, request: Request<Body>) -> Reply {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header("content-type").unwrap_or_default();
    let request_id = header("x-request-id");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    Reply {
        status,
        content_type,
        request_id,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(router: Router, path: &str) -> Reply {
    send(router, Request::get(path).body(Body::empty()).unwrap()).await
}

/// Serve `server` on an ephemeral local port.
pub async fn start_server(server: HttpServer) -> (SocketAddr, Shutdown, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();

    let handle = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown, handle)
}
