//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → deadline.rs (one budget-bound, cancellable deadline per request)
//!     → cloned into every upstream call and every coordinator wait
//!     → fires once: timer expiry or explicit cancel
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call shares the request deadline
//! - No retries, no circuit breaking: a failed call is final for its request
//! - Cancellation is a value passed by clone, never global state

pub mod deadline;

pub use deadline::{Deadline, DeadlineGuard, Expiry};
