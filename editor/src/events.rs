//! Change notifications handed back to the host.
//!
//! Mutations queue an [`Action`] on the [`Notifier`] once they have committed;
//! the engine drains the queue and returns it from the public entry point, so
//! the host never observes a half-applied operation.

use serde::Serialize;

use crate::ids::EntityId;
use crate::lifecycle::SimState;
use crate::modes::ModeName;

/// Notifications returned from engine entry points for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Action {
    PrimitiveCreated { id: EntityId },
    PrimitiveDeleted { id: EntityId },
    ConnectionCreated { id: EntityId },
    ConnectionDeleted { id: EntityId },
    /// The selection changed. Order of `selected` is not meaningful.
    SelectionChanged { selected: Vec<EntityId> },
    /// A single property write was accepted.
    PropertyChanged { id: EntityId, property: &'static str },
    SimulationStateChanged { state: SimState },
    /// Gravity or timestep changed.
    SettingsChanged,
    ModeChanged { mode: ModeName },
    CameraChanged,
    SceneCleared,
}

/// Queue of pending notifications.
#[derive(Debug, Default)]
pub struct Notifier {
    pending: Vec<Action>,
}

impl Notifier {
    pub fn push(&mut self, action: Action) {
        self.pending.push(action);
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
