//! Identity lookup adapter ("fetch a user").

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::schema::IdentityCallConfig;
use crate::resilience::Deadline;
use crate::upstream::behavior::{BehaviorSelector, CallBehavior, FixedBehavior};
use crate::upstream::types::{CallOutcome, Identity};
use crate::upstream::Upstream;

pub struct IdentityService {
    identity: Identity,
    behavior: Arc<dyn BehaviorSelector>,
}

impl IdentityService {
    pub fn new(identity: Identity, behavior: Arc<dyn BehaviorSelector>) -> Self {
        Self { identity, behavior }
    }

    pub fn from_config(config: &IdentityCallConfig) -> Self {
        Self::new(
            Identity {
                id: config.user_id.clone(),
                name: config.user_name.clone(),
            },
            Arc::new(FixedBehavior(CallBehavior::succeed_after(Duration::from_millis(
                config.latency_ms,
            )))),
        )
    }
}

#[async_trait]
impl Upstream for IdentityService {
    type Output = Identity;

    fn name(&self) -> &'static str {
        "identity"
    }

    async fn call(&self, deadline: Deadline) -> CallOutcome<Identity> {
        let behavior = self.behavior.select();
        tracing::trace!(?behavior, "identity lookup");
        behavior.perform(&deadline, || self.identity.clone()).await
    }
}
