//! Per-request deadline enforcement.
//!
//! # Responsibilities
//! - Bound every upstream call of a request by one shared budget
//! - Let any holder cancel the request explicitly
//! - Make the firing visible to every waiter at once
//!
//! # Design Decisions
//! - Built on `CancellationToken` so cancellation is idempotent and cloneable
//! - Uses Tokio's clock, so paused-time tests see exact expiries
//! - The deadline token is a child of the request scope: cancelling the scope
//!   cancels the deadline, never the other way round

use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Why a deadline stopped being open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The budget ran out.
    TimedOut,
    /// Someone cancelled the deadline (or its parent scope) before the budget ran out.
    Cancelled,
}

/// Shared deadline for all the work of one request.
///
/// Cloning is cheap; all clones observe the same expiry instant and the same
/// cancellation token.
#[derive(Debug, Clone)]
pub struct Deadline {
    token: CancellationToken,
    expires_at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start a deadline `budget` from now, scoped under `parent`.
    pub fn after(budget: Duration, parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
            expires_at: Instant::now() + budget,
            budget,
        }
    }

    /// Wait until the deadline fires.
    ///
    /// When the timer wins the race the token is cancelled as well, so waiters
    /// that only watch the token wake up too. Once the budget has run out the
    /// result is always `TimedOut`, whichever branch woke the waiter.
    pub async fn expired(&self) -> Expiry {
        tokio::select! {
            biased;
            _ = time::sleep_until(self.expires_at) => {
                self.token.cancel();
                Expiry::TimedOut
            }
            _ = self.token.cancelled() => {
                if Instant::now() >= self.expires_at {
                    Expiry::TimedOut
                } else {
                    Expiry::Cancelled
                }
            }
        }
    }

    /// Cancel the deadline now. Calling this more than once is a no-op.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the budget ran out or the deadline was cancelled.
    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.expires_at
    }

    /// Time left before the budget runs out.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// The budget this deadline was started with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Cancel the deadline when the returned guard is dropped.
    ///
    /// The coordinator holds one so that a request dropped mid-flight (client
    /// disconnect) stops its workers instead of letting them run to the budget.
    pub fn guard(&self) -> DeadlineGuard {
        DeadlineGuard {
            _inner: self.token.clone().drop_guard(),
        }
    }
}

/// Cancels its deadline on drop.
#[derive(Debug)]
pub struct DeadlineGuard {
    _inner: DropGuard,
}
