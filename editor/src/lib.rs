//! Editing and simulation core for a 2D rigid-body mechanism editor.
//!
//! The crate owns everything between raw host input and the physics backend:
//! a pan/zoom camera, the entity model of primitives and connections, the
//! binding that keeps one rigid body per primitive and one joint per
//! connection, hit-testing, selection, the interaction modes, and the
//! play/pause/reset lifecycle driven by a fixed-step clock. Drawing, widgets
//! and file dialogs belong to the host, which talks to
//! [`engine::EngineCore`] and reacts to the [`events::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Host-facing facade, per-frame driver and overlay |
//! | [`scene`] | Document, physics binding, selection and notifier in lockstep |
//! | [`doc`] | Primitive and connection types and the in-memory store |
//! | [`physics`] | Rapier world wrapper: bodies, colliders, joints, stepping |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`clock`] | Fixed-step accumulator clock |
//! | [`lifecycle`] | Play/pause/reset state machine and pose capture |
//! | [`interaction`] | Mode switching, panning and event dispatch |
//! | [`modes`] | Select, place and connect modes |
//! | [`input`] | Pointer, key and cursor types |
//! | [`hit`] | Point and rectangle hit-testing |
//! | [`selection`] | Selected-id set |
//! | [`props`] | Validated property writes |
//! | [`snapshot`] | Whole-scene save and load |
//! | [`config`] | Physics configuration |
//! | [`events`] | Notifications returned to the host |
//! | [`error`] | Recoverable error types |
//! | [`ids`] | Entity ids and their generator |
//! | [`consts`] | Shared numeric constants (zoom limits, timestep bounds, etc.) |

pub mod camera;
pub mod clock;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod events;
pub mod hit;
pub mod ids;
pub mod input;
pub mod interaction;
pub mod lifecycle;
pub mod modes;
pub mod physics;
pub mod props;
pub mod scene;
pub mod selection;
pub mod snapshot;

pub use engine::{EngineCore, Frame, Overlay};
pub use events::Action;
pub use snapshot::SceneSnapshot;
