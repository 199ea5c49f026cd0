//! Upstream result types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resilience::Expiry;

/// Result of the identity lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

/// Result of the permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
}

/// Result of the best-effort context call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementalContext {
    pub summary: String,
}

/// Why an upstream call did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The upstream answered with an error of its own.
    #[error("{0}")]
    Domain(String),

    /// The shared request budget ran out before the call finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The request was cancelled before the call finished.
    #[error("call cancelled")]
    Cancelled,

    /// The worker ended without delivering an outcome.
    #[error("worker ended without a result")]
    Lost,
}

impl UpstreamError {
    /// True when the call stopped because the request deadline fired.
    pub fn is_deadline(&self) -> bool {
        matches!(self, UpstreamError::DeadlineExceeded | UpstreamError::Cancelled)
    }
}

impl From<Expiry> for UpstreamError {
    fn from(expiry: Expiry) -> Self {
        match expiry {
            Expiry::TimedOut => UpstreamError::DeadlineExceeded,
            Expiry::Cancelled => UpstreamError::Cancelled,
        }
    }
}

/// Single outcome of one upstream call, carried from worker to coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    Success(T),
    Failure(UpstreamError),
}

impl<T> CallOutcome<T> {
    /// Metric/log label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            CallOutcome::Success(_) => "success",
            CallOutcome::Failure(UpstreamError::Domain(_)) => "error",
            CallOutcome::Failure(UpstreamError::DeadlineExceeded) => "timeout",
            CallOutcome::Failure(UpstreamError::Cancelled) => "cancelled",
            CallOutcome::Failure(UpstreamError::Lost) => "lost",
        }
    }
}
