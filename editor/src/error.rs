//! Recoverable error types.
//!
//! Nothing here is fatal: the editor expects invalid input and stale
//! references, rejects them, and leaves the scene unchanged.

use crate::ids::EntityId;

/// A scene mutation referenced state that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("no live body for primitive: {0}")]
    BodyNotFound(EntityId),
    #[error("cannot connect a body to itself: {0}")]
    SelfConnection(EntityId),
}

/// A property or settings write was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("entity not found: {0}")]
    NotFound(EntityId),
    #[error("edits are only allowed while editing")]
    NotEditing,
    #[error("{field} is not a number: {raw:?}")]
    NotANumber { field: &'static str, raw: String },
    #[error("{field} expects true or false: {raw:?}")]
    NotABool { field: &'static str, raw: String },
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("{field} does not apply to this {kind}")]
    NotApplicable { field: &'static str, kind: &'static str },
    #[error("unknown body type: {0:?}")]
    UnknownBodyType(String),
    #[error("unknown property: {0:?}")]
    UnknownField(String),
    #[error("joint could not be built: {0}")]
    Joint(#[from] SceneError),
}
