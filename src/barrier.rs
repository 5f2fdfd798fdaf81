//! Interval barrier: trailing-edge rate limiting for sync callbacks.
//!
//! DESIGN
//! ======
//! Wraps an action so it runs at most once per interval. A trigger with no
//! timer pending schedules the action for `last_fired + interval` (or right
//! away if that moment has passed); triggers arriving while a timer is
//! pending are absorbed. The action takes no arguments. Only the fact that
//! something changed survives the window, never the payload of any single
//! trigger, so the action must read current state when it runs.
//!
//! ```text
//! triggers   e  e      e         e     e   e                e
//! windows    [        ][         ][        ]                [        ]
//! fires      ✓  ✗      ✗------✓  ✗     ✗  ✗-----✓           ✓
//! ```
//!
//! TRADE-OFFS
//! ==========
//! Timers are Tokio tasks and timestamps are `tokio::time::Instant`, so
//! tests drive the barrier under paused time. Once scheduled, a timer always
//! fires; there is no cancellation.
//!
//! Shared-state collaborators may report changes from their own threads, so
//! timers are spawned on the runtime that was current when the barrier was
//! built, not on the caller's. A barrier built outside any runtime drops its
//! triggers with a warning.

#[cfg(test)]
#[path = "barrier_test.rs"]
mod barrier_test;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{trace, warn};

/// Interval used when a barrier is built with a zero interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

type Action = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Default)]
struct BarrierState {
    /// When the action last ran. `None` until the first firing.
    last_fired: Option<Instant>,
    /// A timer is scheduled and has not fired yet.
    pending: bool,
}

/// Trailing-edge throttle around a no-argument action.
///
/// Cloning yields another handle to the same barrier.
#[derive(Clone)]
pub struct IntervalBarrier {
    name: &'static str,
    interval: Duration,
    action: Action,
    state: Arc<Mutex<BarrierState>>,
    runtime: Option<Handle>,
}

impl IntervalBarrier {
    #[must_use]
    pub fn new<F>(name: &'static str, interval: Duration, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let interval = if interval.is_zero() { DEFAULT_INTERVAL } else { interval };
        Self {
            name,
            interval,
            action: Arc::new(action),
            state: Arc::new(Mutex::new(BarrierState::default())),
            runtime: Handle::try_current().ok(),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Request a run of the wrapped action. Safe to call from any thread.
    pub fn trigger(&self) {
        let Some(runtime) = &self.runtime else {
            warn!(barrier = self.name, "interval barrier has no runtime; trigger dropped");
            return;
        };

        let delay = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.pending {
                return;
            }
            state.pending = true;
            self.delay_from(state.last_fired, Instant::now())
        };

        trace!(barrier = self.name, ?delay, "interval barrier scheduled");

        let state = Arc::clone(&self.state);
        let action = Arc::clone(&self.action);
        let name = self.name;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                state.pending = false;
                state.last_fired = Some(Instant::now());
            }
            trace!(barrier = name, "interval barrier fired");
            action();
        });
    }

    /// A timer is scheduled and further triggers are being absorbed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).pending
    }

    #[must_use]
    pub fn last_fired(&self) -> Option<Instant> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).last_fired
    }

    fn delay_from(&self, last_fired: Option<Instant>, now: Instant) -> Duration {
        last_fired.map_or(Duration::ZERO, |last| (last + self.interval).saturating_duration_since(now))
    }
}

impl std::fmt::Debug for IntervalBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalBarrier")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("state", &self.state)
            .field("has_runtime", &self.runtime.is_some())
            .finish_non_exhaustive()
    }
}
