//! Readiness gate over the three independent load signals.
//!
//! Document, shared-state connection, and 3D model each complete on their
//! own schedule and in any order. Flags only go false → true. The call that
//! first observes all three set is told to run the bootstrap resync; every
//! other call, including repeats, is not.

#[cfg(test)]
#[path = "readiness_test.rs"]
mod readiness_test;

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Document,
    SharedState,
    Model,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessFlags {
    pub document: bool,
    pub shared_state: bool,
    pub model: bool,
}

impl ReadinessFlags {
    #[must_use]
    pub fn all(&self) -> bool {
        self.document && self.shared_state && self.model
    }

    #[must_use]
    pub fn get(&self, signal: Signal) -> bool {
        match signal {
            Signal::Document => self.document,
            Signal::SharedState => self.shared_state,
            Signal::Model => self.model,
        }
    }

    fn raise(&mut self, signal: Signal) {
        match signal {
            Signal::Document => self.document = true,
            Signal::SharedState => self.shared_state = true,
            Signal::Model => self.model = true,
        }
    }
}

#[derive(Debug, Default)]
struct GateState {
    flags: ReadinessFlags,
    resync_claimed: bool,
}

#[derive(Debug, Default)]
pub struct ReadinessGate {
    state: Mutex<GateState>,
}

impl ReadinessGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `signal`. Returns `true` exactly once over the gate's lifetime:
    /// on the call that completes the set.
    pub fn set(&self, signal: Signal) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.flags.raise(signal);
        debug!(?signal, flags = ?state.flags, "readiness: signal raised");

        if state.flags.all() && !state.resync_claimed {
            state.resync_claimed = true;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_set(&self, signal: Signal) -> bool {
        self.flags().get(signal)
    }

    #[must_use]
    pub fn flags(&self) -> ReadinessFlags {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).flags
    }
}
