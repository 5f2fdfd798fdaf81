//! 3D viewport seam.
//!
//! DESIGN
//! ======
//! Rendering, projection, and animation mixing belong to the external 3D
//! runtime. The sync layer needs three calls into it ([`Viewport`]) and one
//! event out of it: "viewpoint changed", which the host forwards to
//! `SyncSession::viewpoint_changed`. The runtime fires that event for local
//! navigation *and* while it animates towards an applied remote view; the
//! chairmanship is what tells the two apart.
//!
//! [`SimViewport`] is an in-memory runtime for the demo and tests. Applied
//! views land immediately (the animation is recorded, not played).

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::view::Transform;

pub trait Viewport: Send + Sync {
    /// Current camera transform, or `None` while the runtime is not attached.
    fn current_view(&self) -> Option<Transform>;

    /// Animate the camera to `target` over `duration`.
    fn apply_view(&self, target: &Transform, duration: Duration);

    /// Frame the whole model.
    fn show_all(&self);
}

pub type ViewChangedHook = Arc<dyn Fn() + Send + Sync>;

/// One call to [`Viewport::apply_view`], as recorded by [`SimViewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedView {
    pub target: Transform,
    pub duration: Duration,
}

struct SimInner {
    attached: bool,
    current: Transform,
    home: Transform,
    applied: Vec<AppliedView>,
}

pub struct SimViewport {
    inner: Mutex<SimInner>,
    hook: Mutex<Option<ViewChangedHook>>,
}

impl SimViewport {
    /// An attached viewport at the identity transform whose "show all"
    /// position is `home`.
    #[must_use]
    pub fn new(home: Transform) -> Self {
        Self {
            inner: Mutex::new(SimInner { attached: true, current: Transform::IDENTITY, home, applied: Vec::new() }),
            hook: Mutex::new(None),
        }
    }

    /// A viewport whose runtime has not been attached yet.
    #[must_use]
    pub fn detached(home: Transform) -> Self {
        let viewport = Self::new(home);
        viewport.set_attached(false);
        viewport
    }

    pub fn set_attached(&self, attached: bool) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).attached = attached;
    }

    /// Register the viewpoint-changed listener, replacing any previous one.
    pub fn on_viewpoint_changed(&self, hook: ViewChangedHook) {
        *self.hook.lock().unwrap_or_else(PoisonError::into_inner) = Some(hook);
    }

    /// Local navigation: move the camera and fire viewpoint-changed.
    pub fn move_to(&self, target: Transform) {
        self.set_current(target);
    }

    #[must_use]
    pub fn current(&self) -> Transform {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).current
    }

    #[must_use]
    pub fn applied(&self) -> Vec<AppliedView> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).applied.clone()
    }

    fn set_current(&self, target: Transform) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).current = target;
        self.fire_changed();
    }

    fn fire_changed(&self) {
        let hook = self.hook.lock().unwrap_or_else(PoisonError::into_inner).clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl Viewport for SimViewport {
    fn current_view(&self) -> Option<Transform> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.attached.then_some(inner.current)
    }

    fn apply_view(&self, target: &Transform, duration: Duration) {
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.applied.push(AppliedView { target: *target, duration });
            inner.current = *target;
        }
        self.fire_changed();
    }

    fn show_all(&self) {
        let home = self.inner.lock().unwrap_or_else(PoisonError::into_inner).home;
        self.set_current(home);
    }
}
