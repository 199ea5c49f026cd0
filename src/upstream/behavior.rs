//! Simulated upstream behavior and its selection strategies.
//!
//! Every adapter asks its `BehaviorSelector` what to do on each call. Production
//! wiring keeps identity and access on a fixed latency and lets the context
//! call pick randomly between a fast answer, a slow answer and an outright
//! failure. Tests swap in `FixedBehavior` to pin any of those modes.

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::resilience::Deadline;
use crate::upstream::types::{CallOutcome, UpstreamError};

/// What a simulated upstream does on one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallBehavior {
    /// Answer successfully after `after`, unless the deadline fires first.
    Succeed { after: Duration },
    /// Fail immediately with a domain error.
    Fail { reason: String },
}

impl CallBehavior {
    pub fn succeed_after(after: Duration) -> Self {
        CallBehavior::Succeed { after }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        CallBehavior::Fail {
            reason: reason.into(),
        }
    }

    /// Play this behavior against `deadline`, producing `value` on success.
    pub async fn perform<T>(self, deadline: &Deadline, value: impl FnOnce() -> T) -> CallOutcome<T> {
        match self {
            CallBehavior::Fail { reason } => CallOutcome::Failure(UpstreamError::Domain(reason)),
            CallBehavior::Succeed { after } => {
                tokio::select! {
                    _ = tokio::time::sleep(after) => CallOutcome::Success(value()),
                    expiry = deadline.expired() => CallOutcome::Failure(expiry.into()),
                }
            }
        }
    }
}

/// Strategy that decides the behavior of each call.
pub trait BehaviorSelector: Send + Sync {
    fn select(&self) -> CallBehavior;
}

/// Always the same behavior.
#[derive(Debug, Clone)]
pub struct FixedBehavior(pub CallBehavior);

impl BehaviorSelector for FixedBehavior {
    fn select(&self) -> CallBehavior {
        self.0.clone()
    }
}

/// The three ways the context upstream can respond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextModes {
    pub fast: Duration,
    pub slow: Duration,
    pub failure: String,
}

impl ContextModes {
    pub fn fast(&self) -> CallBehavior {
        CallBehavior::succeed_after(self.fast)
    }

    pub fn slow(&self) -> CallBehavior {
        CallBehavior::succeed_after(self.slow)
    }

    pub fn failure(&self) -> CallBehavior {
        CallBehavior::fail(self.failure.clone())
    }
}

impl Default for ContextModes {
    fn default() -> Self {
        Self {
            fast: Duration::from_millis(100),
            slow: Duration::from_secs(3),
            failure: "vector memory failed".to_string(),
        }
    }
}

/// Picks uniformly among the context modes.
pub struct RandomBehavior {
    modes: ContextModes,
    rng: Mutex<StdRng>,
}

impl RandomBehavior {
    /// Seeded from OS entropy.
    pub fn new(modes: ContextModes) -> Self {
        Self {
            modes,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(modes: ContextModes, seed: u64) -> Self {
        Self {
            modes,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl BehaviorSelector for RandomBehavior {
    fn select(&self) -> CallBehavior {
        // A poisoned lock still holds a usable generator.
        let pick = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..3),
            Err(poisoned) => poisoned.into_inner().gen_range(0..3),
        };
        match pick {
            0 => self.modes.fast(),
            1 => self.modes.slow(),
            _ => self.modes.failure(),
        }
    }
}
