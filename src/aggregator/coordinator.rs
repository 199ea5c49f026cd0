//! Per-request orchestration.
//!
//! # Request State Machine
//! ```text
//! Init ──▶ FanOut ──▶ Collecting ──┬──▶ Assembled ──┐
//!                                  └──▶ Aborted ────┴──▶ Drained ──▶ Done
//! ```
//!
//! - Init: one `Deadline` from the configured budget, scoped under the caller's token
//! - FanOut: identity, access and context launched on their own tasks
//! - Collecting: identity, then access, then context, each raced against the deadline
//! - Aborted: a mandatory call failed or timed out; remaining workers are cancelled
//! - Drained: every worker has ended, whichever path was taken
//!
//! Mandatory outcomes decide the request. The context outcome only decides
//! whether the response carries a `context` field.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::aggregator::error::{AggregateError, Degradation, MandatoryService};
use crate::aggregator::fanout::{FanOut, InFlight};
use crate::aggregator::response::AggregatedResponse;
use crate::config::AggregatorConfig;
use crate::observability::metrics;
use crate::resilience::Deadline;
use crate::upstream::{
    AccessDecision, AccessService, CallOutcome, ContextService, Identity, IdentityService,
    SupplementalContext, Upstream, UpstreamError,
};

pub type IdentityUpstream = dyn Upstream<Output = Identity>;
pub type AccessUpstream = dyn Upstream<Output = AccessDecision>;
pub type ContextUpstream = dyn Upstream<Output = SupplementalContext>;

/// Result of waiting on one slot.
enum Collected<T> {
    Outcome(CallOutcome<T>),
    DeadlineReached,
}

/// Wait for one call's outcome, giving up when the deadline fires.
async fn collect<T>(deadline: &Deadline, slot: oneshot::Receiver<CallOutcome<T>>) -> Collected<T> {
    tokio::select! {
        biased;
        received = slot => match received {
            Ok(outcome) => Collected::Outcome(outcome),
            Err(_) => Collected::Outcome(CallOutcome::Failure(UpstreamError::Lost)),
        },
        _ = deadline.expired() => Collected::DeadlineReached,
    }
}

/// Collect a mandatory outcome; any failure aborts the request.
async fn collect_mandatory<T>(
    service: MandatoryService,
    deadline: &Deadline,
    slot: oneshot::Receiver<CallOutcome<T>>,
) -> Result<T, AggregateError> {
    match collect(deadline, slot).await {
        Collected::Outcome(CallOutcome::Success(value)) => Ok(value),
        Collected::Outcome(CallOutcome::Failure(err)) => Err(AggregateError::from_failure(service, err)),
        Collected::DeadlineReached => Err(AggregateError::MandatoryServiceTimeout { service }),
    }
}

/// Collect the optional outcome; failure only drops the field.
async fn collect_optional<T>(
    deadline: &Deadline,
    slot: oneshot::Receiver<CallOutcome<T>>,
) -> Result<T, Degradation> {
    match collect(deadline, slot).await {
        Collected::Outcome(CallOutcome::Success(value)) => Ok(value),
        Collected::Outcome(CallOutcome::Failure(err)) => Err(Degradation::from_failure(err)),
        Collected::DeadlineReached => Err(Degradation::TimedOut),
    }
}

/// Fans a summary request out to its three upstreams and folds the results.
#[derive(Clone)]
pub struct Aggregator {
    identity: Arc<IdentityUpstream>,
    access: Arc<AccessUpstream>,
    context: Arc<ContextUpstream>,
    budget: Duration,
    in_flight: InFlight,
}

impl Aggregator {
    pub fn new(
        identity: Arc<IdentityUpstream>,
        access: Arc<AccessUpstream>,
        context: Arc<ContextUpstream>,
        budget: Duration,
    ) -> Self {
        Self {
            identity,
            access,
            context,
            budget,
            in_flight: InFlight::default(),
        }
    }

    /// Wire the simulated upstreams described by `config`.
    pub fn from_config(config: &AggregatorConfig) -> Self {
        let upstreams = &config.upstreams;
        Self::new(
            Arc::new(IdentityService::from_config(&upstreams.identity)),
            Arc::new(AccessService::from_config(&upstreams.access)),
            Arc::new(ContextService::from_config(&upstreams.context)),
            config.deadline.budget(),
        )
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Upstream workers currently running, across all requests.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Aggregate with a fresh request scope.
    pub async fn aggregate(&self) -> Result<AggregatedResponse, AggregateError> {
        self.aggregate_within(&CancellationToken::new()).await
    }

    /// Aggregate under `scope`. Cancelling `scope` cancels every call of this request.
    ///
    /// Returns only after all three workers have ended.
    pub async fn aggregate_within(
        &self,
        scope: &CancellationToken,
    ) -> Result<AggregatedResponse, AggregateError> {
        let deadline = Deadline::after(self.budget, scope);
        let _guard = deadline.guard();

        let mut fan_out = FanOut::new(self.in_flight.clone());
        let identity = fan_out.spawn(Arc::clone(&self.identity), deadline.clone());
        let access = fan_out.spawn(Arc::clone(&self.access), deadline.clone());
        let context = fan_out.spawn(Arc::clone(&self.context), deadline.clone());

        let result = self.collect_all(&deadline, identity, access, context).await;

        if let Err(err) = &result {
            tracing::warn!(
                service = %err.service(),
                timeout = err.is_timeout(),
                deadline_expired = deadline.is_expired(),
                remaining_ms = deadline.remaining().as_millis() as u64,
                error = %err,
                "Aggregation aborted"
            );
            deadline.cancel();
        }

        let joined = fan_out.drain().await;
        tracing::debug!(
            joined,
            budget_ms = deadline.budget().as_millis() as u64,
            "Upstream workers drained"
        );

        result
    }

    async fn collect_all(
        &self,
        deadline: &Deadline,
        identity: oneshot::Receiver<CallOutcome<Identity>>,
        access: oneshot::Receiver<CallOutcome<AccessDecision>>,
        context: oneshot::Receiver<CallOutcome<SupplementalContext>>,
    ) -> Result<AggregatedResponse, AggregateError> {
        let identity = collect_mandatory(MandatoryService::Identity, deadline, identity).await?;
        let access = collect_mandatory(MandatoryService::Access, deadline, access).await?;

        let context = match collect_optional(deadline, context).await {
            Ok(context) => Some(context),
            Err(degradation) => {
                tracing::info!(reason = degradation.reason(), "Context unavailable, responding without it");
                if let Degradation::Failed(err) = &degradation {
                    tracing::debug!(error = %err, "Context upstream error");
                }
                metrics::record_degraded(degradation.reason());
                None
            }
        };

        Ok(AggregatedResponse::assemble(identity, access, context))
    }
}
