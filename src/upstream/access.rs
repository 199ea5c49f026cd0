//! Permission check adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::schema::AccessCallConfig;
use crate::resilience::Deadline;
use crate::upstream::behavior::{BehaviorSelector, CallBehavior, FixedBehavior};
use crate::upstream::types::{AccessDecision, CallOutcome};
use crate::upstream::Upstream;

pub struct AccessService {
    decision: AccessDecision,
    behavior: Arc<dyn BehaviorSelector>,
}

impl AccessService {
    pub fn new(decision: AccessDecision, behavior: Arc<dyn BehaviorSelector>) -> Self {
        Self { decision, behavior }
    }

    pub fn from_config(config: &AccessCallConfig) -> Self {
        Self::new(
            AccessDecision {
                allowed: config.allowed,
            },
            Arc::new(FixedBehavior(CallBehavior::succeed_after(Duration::from_millis(
                config.latency_ms,
            )))),
        )
    }
}

#[async_trait]
impl Upstream for AccessService {
    type Output = AccessDecision;

    fn name(&self) -> &'static str {
        "access"
    }

    async fn call(&self, deadline: Deadline) -> CallOutcome<AccessDecision> {
        let behavior = self.behavior.select();
        tracing::trace!(?behavior, "permission check");
        behavior.perform(&deadline, || self.decision).await
    }
}
