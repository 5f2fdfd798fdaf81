//! Camera transforms and the shared `view_matrix` payload.
//!
//! DESIGN
//! ======
//! A `ViewState` is a camera transform stamped with the peer that produced
//! it. It travels verbatim through the shared state as
//! `{ translation, rotation, peerId }`. Peers never deep-compare views: the
//! only field anyone inspects is `peerId`, for echo suppression.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;
use crate::peer::PeerId;

/// Camera position and orientation.
///
/// `rotation` is a unit quaternion in `x, y, z, w` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: [f64; 3],
    pub rotation: [f64; 4],
}

impl Transform {
    pub const IDENTITY: Self = Self { translation: [0.0; 3], rotation: [0.0, 0.0, 0.0, 1.0] };

    #[must_use]
    pub fn new(translation: [f64; 3], rotation: [f64; 4]) -> Self {
        Self { translation, rotation }
    }

    /// Same orientation, moved to `translation`.
    #[must_use]
    pub fn with_translation(self, translation: [f64; 3]) -> Self {
        Self { translation, ..self }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A camera transform plus the identity of the peer that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub translation: [f64; 3],
    pub rotation: [f64; 4],
    pub peer_id: PeerId,
}

impl ViewState {
    /// Stamp a local transform with the publishing peer's identity.
    #[must_use]
    pub fn stamped(transform: Transform, peer_id: PeerId) -> Self {
        Self { translation: transform.translation, rotation: transform.rotation, peer_id }
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform { translation: self.translation, rotation: self.rotation }
    }

    /// Parse the value stored under `view_matrix`.
    ///
    /// `null` means nobody has published yet and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedRemoteState`] when the value does not have
    /// the `{ translation, rotation, peerId }` shape.
    pub fn from_shared(value: &Value) -> Result<Option<Self>, SyncError> {
        if value.is_null() {
            return Ok(None);
        }
        let view = serde_json::from_value(value.clone()).map_err(|e| SyncError::MalformedRemoteState(e.to_string()))?;
        Ok(Some(view))
    }

    /// Encode for storage under `view_matrix`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if encoding fails.
    pub fn to_shared(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
