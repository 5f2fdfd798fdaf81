//! Chairmanship: who last moved the camera.
//!
//! DESIGN
//! ======
//! A viewpoint-changed event looks the same whether the local user dragged
//! the camera or a remote view is being animated in. The chairman
//! disambiguates: local interactions claim the chair *before* the viewport
//! emits its change event, and applied remote views hand the chair to their
//! author *after* the view is applied. The outbound path only publishes
//! while the chair is local.
//!
//! It is a best-effort heuristic, not a lock. Between ownership transitions
//! the value is stale. Remote navigation and remote animation are not told
//! apart; both simply hand the chair to the remote peer.

#[cfg(test)]
#[path = "chair_test.rs"]
mod chair_test;

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::peer::PeerId;

/// Local interactions reported by the viewport host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// Pointer drag (rotate/pan) began.
    DragStart,
    /// Programmatic animation started by local UI, e.g. "show all" or double-click.
    AnimateTo,
    /// Keyboard or wheel movement of the view.
    MoveView,
}

pub struct ChairTracker {
    local: PeerId,
    chairman: Mutex<PeerId>,
}

impl ChairTracker {
    /// The chair starts out local.
    #[must_use]
    pub fn new(local: PeerId) -> Self {
        Self { local, chairman: Mutex::new(local) }
    }

    #[must_use]
    pub fn local(&self) -> PeerId {
        self.local
    }

    #[must_use]
    pub fn current(&self) -> PeerId {
        *self.chairman.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        self.current() == self.local
    }

    /// Take the chair for this peer. Call before the interaction's change event fires.
    pub fn claim_local(&self) {
        self.hand_to(self.local);
    }

    /// Give the chair to `peer`. Call after that peer's view has been applied.
    pub fn hand_to(&self, peer: PeerId) {
        let mut chairman = self.chairman.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *chairman;
        if previous != peer {
            debug!(from = %previous, to = %peer, "chair: handover");
        }
        *chairman = peer;
    }

    /// Record that a local interaction began.
    pub fn on_interaction(&self, interaction: Interaction) {
        debug!(?interaction, "chair: local interaction");
        self.claim_local();
    }
}

impl std::fmt::Debug for ChairTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChairTracker")
            .field("local", &self.local)
            .field("chairman", &self.current())
            .finish()
    }
}
