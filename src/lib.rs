//! Request-scoped concurrent summary aggregator.
//!
//! Each `GET /chat/summary` fans out to three upstreams under one shared
//! deadline: identity and access are mandatory, context is best effort.
//! The response degrades (no `context`) instead of failing when only the
//! optional call is slow or broken.

pub mod aggregator;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use aggregator::{AggregateError, AggregatedResponse, Aggregator};
pub use config::schema::AggregatorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
