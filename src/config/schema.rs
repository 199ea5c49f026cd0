//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the aggregator.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the summary aggregator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Per-request deadline shared by all upstream calls.
    pub deadline: DeadlineConfig,

    /// Simulated upstream dependencies.
    pub upstreams: UpstreamsConfig,

    /// Server-level timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Request deadline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeadlineConfig {
    /// Budget for one aggregation, from fan-out to the last collection, in milliseconds.
    pub budget_ms: u64,
}

impl DeadlineConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self { budget_ms: 200 }
    }
}

/// The three upstream dependencies of a summary request.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamsConfig {
    pub identity: IdentityCallConfig,
    pub access: AccessCallConfig,
    pub context: ContextCallConfig,
}

/// Mandatory identity lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityCallConfig {
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
    pub user_id: String,
    pub user_name: String,
}

impl Default for IdentityCallConfig {
    fn default() -> Self {
        Self {
            latency_ms: 10,
            user_id: "123".to_string(),
            user_name: "Name".to_string(),
        }
    }
}

/// Mandatory permission check.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessCallConfig {
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
    pub allowed: bool,
}

impl Default for AccessCallConfig {
    fn default() -> Self {
        Self {
            latency_ms: 50,
            allowed: true,
        }
    }
}

/// Optional context fetch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextCallConfig {
    /// Latency of the fast success mode in milliseconds.
    pub fast_latency_ms: u64,

    /// Latency of the slow success mode in milliseconds.
    pub slow_latency_ms: u64,

    /// Error reported by the failure mode.
    pub failure_message: String,

    pub summary: String,

    /// Seed for mode selection. Unset means OS entropy.
    pub seed: Option<u64>,
}

impl Default for ContextCallConfig {
    fn default() -> Self {
        Self {
            fast_latency_ms: 100,
            slow_latency_ms: 3000,
            failure_message: "vector memory failed".to_string(),
            summary: "some chat info".to_string(),
            seed: None,
        }
    }
}

/// Timeout configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Outer request timeout (whole handler) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
