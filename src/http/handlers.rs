//! Request handlers.
//!
//! # Responsibilities
//! - Run one aggregation per `GET /chat/summary`
//! - Map the outcome to 200 JSON or a 500 plain-text message
//! - Record per-request metrics

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::aggregator::AggregateError;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics;

impl IntoResponse for AggregateError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// `GET /chat/summary`: user, permissions and (when available) chat context.
///
/// Dropping this future (client went away) cancels every upstream call of
/// the request.
pub async fn chat_summary(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id();

    let response = match state.aggregator.aggregate().await {
        Ok(summary) => {
            tracing::debug!(
                request_id = %request_id,
                degraded = summary.is_degraded(),
                "Summary assembled"
            );
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "Summary request failed");
            err.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}

/// `GET /health`: liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
