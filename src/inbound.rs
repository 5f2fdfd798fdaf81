//! Inbound sync: remote `view_matrix` → local camera.
//!
//! DESIGN
//! ======
//! Runs (through the receive barrier) whenever the shared `view_matrix`
//! changes. Reads the current value rather than any change payload, skips
//! views this peer published itself, animates the camera to anything else,
//! and only then hands the chair to the view's author. Applying the view
//! makes the viewport fire viewpoint-changed; by the time the throttled
//! outbound handler runs, the chair is remote and the echo is dropped.

#[cfg(test)]
#[path = "inbound_test.rs"]
mod inbound_test;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::context::SyncContext;
use crate::error::SyncError;
use crate::peer::PeerId;
use crate::readiness::Signal;
use crate::shared::{SharedState, VIEW_MATRIX_KEY};
use crate::view::ViewState;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// A view by `author` was applied and the chair handed to them.
    Applied { author: PeerId },
    /// Nothing has been published yet.
    Empty,
    /// The value was published by this peer.
    SelfEcho,
}

pub struct InboundHandler {
    ctx: Arc<SyncContext>,
    shared: Arc<dyn SharedState>,
    viewport: Arc<dyn Viewport>,
    animation: Duration,
}

impl InboundHandler {
    #[must_use]
    pub fn new(
        ctx: Arc<SyncContext>,
        shared: Arc<dyn SharedState>,
        viewport: Arc<dyn Viewport>,
        animation: Duration,
    ) -> Self {
        Self { ctx, shared, viewport, animation }
    }

    /// Apply the current shared view unless this peer published it.
    ///
    /// # Errors
    ///
    /// [`SyncError::NotReady`] before the model has loaded, and
    /// [`SyncError::MalformedRemoteState`] when the shared value cannot be parsed.
    pub fn handle(&self) -> Result<InboundOutcome, SyncError> {
        self.apply_shared(true)
    }

    /// Bootstrap resync: re-apply the current shared view without the
    /// self-echo check.
    ///
    /// # Errors
    ///
    /// Same as [`InboundHandler::handle`].
    pub fn resync(&self) -> Result<InboundOutcome, SyncError> {
        let outcome = self.apply_shared(false)?;
        info!(local = %self.ctx.local(), ?outcome, "inbound: bootstrap resync");
        Ok(outcome)
    }

    fn apply_shared(&self, skip_own: bool) -> Result<InboundOutcome, SyncError> {
        if !self.ctx.gate.is_set(Signal::Model) {
            return Err(SyncError::NotReady("model"));
        }
        let Some(value) = self.shared.get(VIEW_MATRIX_KEY) else {
            return Ok(InboundOutcome::Empty);
        };
        let Some(view) = ViewState::from_shared(&value)? else {
            return Ok(InboundOutcome::Empty);
        };

        let local = self.ctx.local();
        if skip_own && view.peer_id == local {
            debug!(%local, "inbound: dropped self echo");
            return Ok(InboundOutcome::SelfEcho);
        }

        self.viewport.apply_view(&view.transform(), self.animation);
        self.ctx.chair.hand_to(view.peer_id);
        debug!(%local, author = %view.peer_id, "inbound: applied remote view");
        Ok(InboundOutcome::Applied { author: view.peer_id })
    }
}
