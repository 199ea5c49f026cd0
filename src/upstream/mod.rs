//! Upstream call adapters.
//!
//! # Data Flow
//! ```text
//! coordinator
//!     → Upstream::call(deadline)      (one spawned worker per adapter)
//!     → BehaviorSelector::select()    (what this call does)
//!     → CallBehavior::perform()       (latency raced against the deadline)
//!     → CallOutcome<T>                (delivered through a one-slot channel)
//! ```
//!
//! # Design Decisions
//! - Adapters never panic or return `Err`; every failure is a `CallOutcome`
//! - Adapters share no state with each other; each call is independent
//! - Randomness lives behind `BehaviorSelector`, never in a global

pub mod access;
pub mod behavior;
pub mod context;
pub mod identity;
pub mod types;

use async_trait::async_trait;

use crate::resilience::Deadline;

pub use access::AccessService;
pub use behavior::{BehaviorSelector, CallBehavior, ContextModes, FixedBehavior, RandomBehavior};
pub use context::ContextService;
pub use identity::IdentityService;
pub use types::{AccessDecision, CallOutcome, Identity, SupplementalContext, UpstreamError};

/// A dependency the aggregator calls once per request.
///
/// Implementations must stop promptly once `deadline` fires and report it as
/// `UpstreamError::DeadlineExceeded` (or `Cancelled`).
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str;

    async fn call(&self, deadline: Deadline) -> CallOutcome<Self::Output>;
}
