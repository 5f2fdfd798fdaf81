//! Coordination context shared by the handlers and the readiness gate.
//!
//! One per session, passed around by `Arc` instead of living in globals.

use crate::chair::ChairTracker;
use crate::peer::PeerId;
use crate::readiness::ReadinessGate;

#[derive(Debug)]
pub struct SyncContext {
    pub chair: ChairTracker,
    pub gate: ReadinessGate,
}

impl SyncContext {
    #[must_use]
    pub fn new(local: PeerId) -> Self {
        Self { chair: ChairTracker::new(local), gate: ReadinessGate::new() }
    }

    #[must_use]
    pub fn local(&self) -> PeerId {
        self.chair.local()
    }
}
