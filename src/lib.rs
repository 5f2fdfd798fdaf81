//! Viewpoint synchronization for peers sharing one 3D scene.
//!
//! Each peer publishes its camera into a shared collaborative map under
//! `view_matrix` and follows the views other peers publish. The hard part
//! is echo: applying a remote view moves the local camera, and that move
//! must not be published back. A per-peer *chairman* (who last moved the
//! camera) decides which changes are local and worth sending; trailing-edge
//! interval barriers keep traffic in both directions to one update per
//! window; a readiness gate holds everything until document, shared state,
//! and model are all loaded, then pulls the current shared view in once.
//!
//! Rendering and replication are external collaborators, reached through
//! the [`viewport::Viewport`] and [`shared::SharedState`] traits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Per-peer wiring; the entry point for hosts |
//! | [`barrier`] | Trailing-edge interval barrier |
//! | [`chair`] | Chairmanship tracker and local interaction events |
//! | [`readiness`] | Three-signal readiness gate |
//! | [`inbound`] | Remote view → local camera |
//! | [`outbound`] | Local camera → shared view |
//! | [`context`] | Chair + gate shared by the handlers |
//! | [`shared`] | Shared-state trait and in-memory map |
//! | [`viewport`] | Viewport trait and simulated viewport |
//! | [`view`] | Transforms and the `view_matrix` payload |
//! | [`peer`] | Peer identity |
//! | [`config`] | Intervals and animation options |
//! | [`error`] | Error taxonomy |

pub mod barrier;
pub mod chair;
pub mod config;
pub mod context;
pub mod error;
pub mod inbound;
pub mod outbound;
pub mod peer;
pub mod readiness;
pub mod session;
pub mod shared;
pub mod view;
pub mod viewport;
