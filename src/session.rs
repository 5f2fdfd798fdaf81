//! Sync session: one peer's wiring of gate, chair, barriers, and handlers.
//!
//! DESIGN
//! ======
//! The host calls into the session from its collaborators' callbacks:
//!
//! | Host event | Session call |
//! |------------|--------------|
//! | page/document ready | [`SyncSession::document_ready`] |
//! | shared-state connection up | [`SyncSession::shared_state_ready`] |
//! | 3D model loaded | [`SyncSession::model_loaded`] |
//! | drag / animate / move began | [`SyncSession::interaction_began`] |
//! | viewport viewpoint-changed | [`SyncSession::viewpoint_changed`] |
//!
//! Data flow:
//!
//! ```text
//! viewpoint-changed → send barrier → OutboundHandler → shared `view_matrix`
//! `view_matrix` changed → receive barrier → InboundHandler → viewport + chair
//! last readiness signal → InboundHandler::resync (once)
//! ```
//!
//! ERROR HANDLING
//! ==============
//! Handler errors are logged with their code and dropped. Nothing here
//! panics or propagates; a failed cycle simply does nothing.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, error, info, warn};

use crate::barrier::IntervalBarrier;
use crate::chair::Interaction;
use crate::config::SyncConfig;
use crate::context::SyncContext;
use crate::error::{ErrorCode, SyncError};
use crate::inbound::{InboundHandler, InboundOutcome};
use crate::outbound::{OutboundHandler, OutboundOutcome};
use crate::peer::PeerId;
use crate::readiness::{ReadinessFlags, Signal};
use crate::shared::{ChangeCallback, SharedState, SwitchableSubscription, VIEW_MATRIX_KEY};
use crate::viewport::{ViewChangedHook, Viewport};

pub struct SyncSession {
    ctx: Arc<SyncContext>,
    config: SyncConfig,
    shared: Arc<dyn SharedState>,
    viewport: Arc<dyn Viewport>,
    inbound: Arc<InboundHandler>,
    send_barrier: IntervalBarrier,
    receive_barrier: IntervalBarrier,
    subscription: Mutex<Option<SwitchableSubscription>>,
    following: AtomicBool,
}

impl SyncSession {
    /// Create a session with a freshly generated peer identity.
    #[must_use]
    pub fn new(config: SyncConfig, shared: Arc<dyn SharedState>, viewport: Arc<dyn Viewport>) -> Arc<Self> {
        Self::with_peer(config, PeerId::random(), shared, viewport)
    }

    #[must_use]
    pub fn with_peer(
        config: SyncConfig,
        local: PeerId,
        shared: Arc<dyn SharedState>,
        viewport: Arc<dyn Viewport>,
    ) -> Arc<Self> {
        let ctx = Arc::new(SyncContext::new(local));
        let inbound = Arc::new(InboundHandler::new(
            Arc::clone(&ctx),
            Arc::clone(&shared),
            Arc::clone(&viewport),
            config.animation_duration,
        ));
        let outbound = OutboundHandler::new(Arc::clone(&ctx), Arc::clone(&shared), Arc::clone(&viewport));

        let receive_barrier = {
            let inbound = Arc::clone(&inbound);
            IntervalBarrier::new("receive", config.receive_interval, move || log_inbound(local, inbound.handle()))
        };
        let send_barrier =
            IntervalBarrier::new("send", config.send_interval, move || log_outbound(local, outbound.handle()));

        info!(%local, ?config, "sync: session created");
        Arc::new(Self {
            ctx,
            config,
            shared,
            viewport,
            inbound,
            send_barrier,
            receive_barrier,
            subscription: Mutex::new(None),
            following: AtomicBool::new(true),
        })
    }

    #[must_use]
    pub fn local_peer(&self) -> PeerId {
        self.ctx.local()
    }

    #[must_use]
    pub fn chairman(&self) -> PeerId {
        self.ctx.chair.current()
    }

    #[must_use]
    pub fn readiness(&self) -> ReadinessFlags {
        self.ctx.gate.flags()
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    // =========================================================================
    // READINESS SIGNALS
    // =========================================================================

    /// The hosting page is ready. Returns `true` if this call ran the bootstrap resync.
    pub fn document_ready(&self) -> bool {
        self.raise(Signal::Document)
    }

    /// The shared-state connection is established. Subscribes the inbound
    /// path to `view_matrix`, then raises the signal.
    pub fn shared_state_ready(&self) -> bool {
        self.subscribe_inbound();
        self.raise(Signal::SharedState)
    }

    /// The 3D model finished loading. Frames the whole model first when
    /// `normalize_on_load` is set.
    pub fn model_loaded(&self) -> bool {
        if self.config.normalize_on_load {
            self.viewport.show_all();
        }
        self.raise(Signal::Model)
    }

    fn raise(&self, signal: Signal) -> bool {
        if !self.ctx.gate.set(signal) {
            return false;
        }
        if let Err(e) = self.inbound.resync() {
            error!(
                local = %self.local_peer(),
                code = e.error_code(),
                retryable = e.retryable(),
                error = %e,
                "sync: bootstrap resync failed"
            );
        }
        true
    }

    fn subscribe_inbound(&self) {
        let mut subscription = self.subscription.lock().unwrap_or_else(PoisonError::into_inner);
        if subscription.is_some() {
            return;
        }
        let barrier = self.receive_barrier.clone();
        let callback: ChangeCallback = Arc::new(move || barrier.trigger());
        let sub = SwitchableSubscription::new(Arc::clone(&self.shared), VIEW_MATRIX_KEY, callback);
        if !self.following.load(Ordering::SeqCst) {
            sub.turn_off();
        }
        *subscription = Some(sub);
    }

    // =========================================================================
    // VIEWPORT EVENTS
    // =========================================================================

    /// A local interaction began; take the chair before its change event fires.
    pub fn interaction_began(&self, interaction: Interaction) {
        self.ctx.chair.on_interaction(interaction);
    }

    /// The viewport reported a viewpoint change.
    pub fn viewpoint_changed(&self) {
        self.send_barrier.trigger();
    }

    /// A listener for the viewport's viewpoint-changed event. Holds the
    /// session weakly so viewport and session can own each other's hooks.
    #[must_use]
    pub fn viewpoint_hook(self: &Arc<Self>) -> ViewChangedHook {
        let session: Weak<Self> = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(session) = session.upgrade() {
                session.viewpoint_changed();
            }
        })
    }

    /// Stop or resume applying remote views. Local publishing is unaffected.
    pub fn set_following(&self, following: bool) {
        self.following.store(following, Ordering::SeqCst);
        let subscription = self.subscription.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sub) = subscription.as_ref() {
            if following {
                sub.turn_on();
            } else {
                sub.turn_off();
            }
        }
        info!(local = %self.local_peer(), following, "sync: follow mode changed");
    }

    #[must_use]
    pub fn is_following(&self) -> bool {
        self.following.load(Ordering::SeqCst)
    }
}

// =============================================================================
// LOGGING
// =============================================================================

fn log_inbound(local: PeerId, result: Result<InboundOutcome, SyncError>) {
    match result {
        Ok(InboundOutcome::Applied { author }) => info!(%local, %author, "sync: applied remote view"),
        Ok(outcome) => debug!(%local, ?outcome, "sync: inbound skipped"),
        Err(e) => log_error(local, "inbound", &e),
    }
}

fn log_outbound(local: PeerId, result: Result<OutboundOutcome, SyncError>) {
    match result {
        Ok(OutboundOutcome::Published(_)) => info!(%local, "sync: published local view"),
        Ok(OutboundOutcome::Suppressed { chairman }) => debug!(%local, %chairman, "sync: outbound suppressed"),
        Err(e) => log_error(local, "outbound", &e),
    }
}

fn log_error(local: PeerId, path: &'static str, e: &SyncError) {
    match e {
        SyncError::NotReady(_) => {
            debug!(%local, path, code = e.error_code(), retryable = e.retryable(), error = %e, "sync: not ready");
        }
        SyncError::MalformedRemoteState(_) | SyncError::PublishFailed(_) => {
            warn!(%local, path, code = e.error_code(), retryable = e.retryable(), error = %e, "sync: cycle dropped");
        }
    }
}
