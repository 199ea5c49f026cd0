//! Fan-out of upstream calls onto independent tasks.
//!
//! # Responsibilities
//! - Spawn one task per upstream call
//! - Hand each call's single outcome back through its own one-slot channel
//! - Keep every spawned task joinable until the request is finished with it
//!
//! # Design Decisions
//! - `oneshot` channels: exactly one write per call, and the write never blocks
//!   even after the coordinator stopped listening
//! - A `JoinSet` tracks completion independently of whether the outcome was
//!   consumed, so `drain` can always wait for every task
//! - Dropping a `FanOut` without draining aborts whatever is still running

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinSet;

use crate::resilience::Deadline;
use crate::upstream::{CallOutcome, Upstream};

/// Live worker count, shared by all requests of one aggregator.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlightGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(self.clone())
    }
}

/// Decrements the worker count when the task ends, including by abort or panic.
struct InFlightGuard(InFlight);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        (self.0).0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The set of calls launched for one request.
pub struct FanOut {
    tasks: JoinSet<()>,
    in_flight: InFlight,
}

impl FanOut {
    pub fn new(in_flight: InFlight) -> Self {
        Self {
            tasks: JoinSet::new(),
            in_flight,
        }
    }

    /// Launch `upstream` on its own task and return the slot its outcome lands in.
    pub fn spawn<U>(&mut self, upstream: Arc<U>, deadline: Deadline) -> oneshot::Receiver<CallOutcome<U::Output>>
    where
        U: Upstream + ?Sized,
    {
        let (tx, rx) = oneshot::channel();
        let guard = self.in_flight.enter();

        self.tasks.spawn(async move {
            let _guard = guard;
            let name = upstream.name();
            let outcome = upstream.call(deadline).await;
            crate::observability::metrics::record_upstream_call(name, outcome.label());
            tracing::debug!(upstream = name, outcome = outcome.label(), "Upstream call finished");

            // The coordinator may have stopped waiting; the outcome is then dropped.
            let _ = tx.send(outcome);
        });

        rx
    }

    /// Wait for every launched task to end. Returns how many were joined.
    pub async fn drain(mut self) -> usize {
        let mut joined = 0;
        while let Some(result) = self.tasks.join_next().await {
            joined += 1;
            if let Err(e) = result {
                tracing::error!(error = %e, "Upstream worker did not complete cleanly");
            }
        }
        joined
    }
}
