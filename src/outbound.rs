//! Outbound sync: local camera → shared `view_matrix`.
//!
//! Runs (through the send barrier) on viewpoint-changed. Publishes only
//! once all readiness signals are set and only while this peer holds the
//! chair; a change caused by animating towards a remote view arrives
//! with the chair already handed away and is suppressed. Publishing is
//! fire-and-forget.

#[cfg(test)]
#[path = "outbound_test.rs"]
mod outbound_test;

use std::sync::Arc;

use tracing::debug;

use crate::context::SyncContext;
use crate::error::SyncError;
use crate::peer::PeerId;
use crate::readiness::Signal;
use crate::shared::{SharedState, SharedStateError, VIEW_MATRIX_KEY};
use crate::view::ViewState;
use crate::viewport::Viewport;

/// Nothing is published before the bootstrap resync had its chance to pull
/// the shared view in, so every signal gates the outbound path.
const GATING_SIGNALS: [(Signal, &str); 3] =
    [(Signal::SharedState, "shared state"), (Signal::Model, "model"), (Signal::Document, "document")];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutboundOutcome {
    Published(ViewState),
    /// Another peer holds the chair; the change is an echo of their view.
    Suppressed { chairman: PeerId },
}

pub struct OutboundHandler {
    ctx: Arc<SyncContext>,
    shared: Arc<dyn SharedState>,
    viewport: Arc<dyn Viewport>,
}

impl OutboundHandler {
    #[must_use]
    pub fn new(ctx: Arc<SyncContext>, shared: Arc<dyn SharedState>, viewport: Arc<dyn Viewport>) -> Self {
        Self { ctx, shared, viewport }
    }

    /// Publish the current local view if this peer holds the chair.
    ///
    /// # Errors
    ///
    /// [`SyncError::NotReady`] before every readiness signal is set or while
    /// the viewport is detached, and [`SyncError::PublishFailed`] when
    /// the shared state rejects the write.
    pub fn handle(&self) -> Result<OutboundOutcome, SyncError> {
        for (signal, name) in GATING_SIGNALS {
            if !self.ctx.gate.is_set(signal) {
                return Err(SyncError::NotReady(name));
            }
        }

        let chairman = self.ctx.chair.current();
        if chairman != self.ctx.local() {
            debug!(local = %self.ctx.local(), %chairman, "outbound: suppressed echo");
            return Ok(OutboundOutcome::Suppressed { chairman });
        }

        let transform = self.viewport.current_view().ok_or(SyncError::NotReady("viewport"))?;
        let view = ViewState::stamped(transform, self.ctx.local());
        let value = view.to_shared().map_err(SharedStateError::from)?;
        self.shared.set(VIEW_MATRIX_KEY, value)?;

        debug!(local = %self.ctx.local(), "outbound: published view");
        Ok(OutboundOutcome::Published(view))
    }
}
