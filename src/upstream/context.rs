//! Contextual data adapter ("fetch contextual data").
//!
//! This upstream is the optional one: it is sometimes fast, sometimes far too
//! slow for the request budget, and sometimes simply broken. Which of the three
//! happens is decided per call by the injected `BehaviorSelector`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::schema::ContextCallConfig;
use crate::resilience::Deadline;
use crate::upstream::behavior::{BehaviorSelector, ContextModes, RandomBehavior};
use crate::upstream::types::{CallOutcome, SupplementalContext};
use crate::upstream::Upstream;

pub struct ContextService {
    context: SupplementalContext,
    behavior: Arc<dyn BehaviorSelector>,
}

impl ContextService {
    pub fn new(context: SupplementalContext, behavior: Arc<dyn BehaviorSelector>) -> Self {
        Self { context, behavior }
    }

    /// Random mode selection, seeded from config when a seed is given.
    pub fn from_config(config: &ContextCallConfig) -> Self {
        let modes = config.modes();
        let selector = match config.seed {
            Some(seed) => RandomBehavior::seeded(modes, seed),
            None => RandomBehavior::new(modes),
        };
        Self::new(
            SupplementalContext {
                summary: config.summary.clone(),
            },
            Arc::new(selector),
        )
    }
}

impl ContextCallConfig {
    pub fn modes(&self) -> ContextModes {
        ContextModes {
            fast: Duration::from_millis(self.fast_latency_ms),
            slow: Duration::from_millis(self.slow_latency_ms),
            failure: self.failure_message.clone(),
        }
    }
}

#[async_trait]
impl Upstream for ContextService {
    type Output = SupplementalContext;

    fn name(&self) -> &'static str {
        "context"
    }

    async fn call(&self, deadline: Deadline) -> CallOutcome<SupplementalContext> {
        let behavior = self.behavior.select();
        tracing::trace!(?behavior, "context fetch");
        behavior.perform(&deadline, || self.context.clone()).await
    }
}
