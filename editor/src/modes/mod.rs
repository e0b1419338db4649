//! Interaction modes.
//!
//! Each mode interprets pointer and keyboard input for one editing activity.
//! The [`crate::interaction::InteractionManager`] owns one instance of every
//! mode, routes events to the active one, and handles panning before any
//! mode sees the event.
//!
//! | Mode | Activity |
//! |------|----------|
//! | [`SelectMode`] | Click/shift-click selection, group drag, marquee, delete |
//! | [`PlaceMode`] | Ghost preview and single-click placement |
//! | [`ConnectMode`] | Two-click connection between bodies |

pub mod connect;
pub mod place;
pub mod select;

pub use connect::ConnectMode;
pub use place::PlaceMode;
pub use select::SelectMode;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::input::{Cursor, Key, PointerEvent};
use crate::lifecycle::SimState;
use crate::scene::Scene;

/// Name of an interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
    #[default]
    Select,
    Place,
    Connect,
}

/// What the manager should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    /// Stay in the current mode.
    Continue,
    /// The mode finished its job; return to select.
    Done,
}

/// Shared state a mode may read and mutate while handling one event.
pub struct ModeContext<'a> {
    pub scene: &'a mut Scene,
    pub sim: SimState,
}

impl ModeContext<'_> {
    /// Whether structural edits are allowed right now.
    #[must_use]
    pub fn editing(&self) -> bool {
        self.sim == SimState::Editing
    }
}

/// A pluggable input interpreter.
///
/// Pointer handlers receive the world-space position computed by the manager
/// plus the raw event, which carries the screen position, button and
/// modifiers.
pub trait InteractionMode {
    fn name(&self) -> ModeName;

    /// Cursor hint while this mode is active and no pan is in progress.
    fn cursor(&self) -> Cursor;

    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, world: Point, event: &PointerEvent) -> ModeOutcome;

    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, world: Point, event: &PointerEvent) -> ModeOutcome;

    fn on_pointer_up(&mut self, _ctx: &mut ModeContext<'_>, _world: Point, _event: &PointerEvent) -> ModeOutcome {
        ModeOutcome::Continue
    }

    fn on_key_down(&mut self, _ctx: &mut ModeContext<'_>, _key: &Key) -> ModeOutcome {
        ModeOutcome::Continue
    }

    fn on_key_up(&mut self, _ctx: &mut ModeContext<'_>, _key: &Key) -> ModeOutcome {
        ModeOutcome::Continue
    }

    /// Pointer capture was lost. Abandon any in-progress gesture.
    fn on_pointer_leave(&mut self, _ctx: &mut ModeContext<'_>) {
        self.clear();
    }

    fn activate(&mut self) {
        self.clear();
    }

    fn deactivate(&mut self) {
        self.clear();
    }

    /// Drop every piece of transient gesture state.
    fn clear(&mut self);
}
