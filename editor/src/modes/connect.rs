//! Connect mode: two-click connection between bodies.
//!
//! The first click on a body records it as endpoint A along with the clicked
//! world point, which becomes A's anchor. The second click on a different body
//! supplies endpoint B and its anchor, creates the connection, selects it and
//! completes. Misses and repeat clicks on A are ignored.

use tracing::{debug, warn};

use crate::camera::Point;
use crate::doc::ConnectionKind;
use crate::ids::EntityId;
use crate::input::{Button, Cursor, Key, PointerEvent};

use super::{InteractionMode, ModeContext, ModeName, ModeOutcome};

/// Feedback for rendering an in-progress connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectState {
    /// Endpoint A and its world anchor, after the first click.
    pub first: Option<(EntityId, Point)>,
    /// Last pointer position in world space.
    pub pointer: Option<Point>,
    /// Body currently under the pointer.
    pub hover: Option<EntityId>,
}

#[derive(Debug)]
pub struct ConnectMode {
    kind: ConnectionKind,
    first: Option<(EntityId, Point)>,
    pointer: Option<Point>,
    hover: Option<EntityId>,
}

impl Default for ConnectMode {
    fn default() -> Self {
        Self { kind: ConnectionKind::Spring, first: None, pointer: None, hover: None }
    }
}

impl ConnectMode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the connection kind. Abandons any pending first endpoint.
    pub fn set_kind(&mut self, kind: ConnectionKind) {
        self.kind = kind;
        self.clear();
    }

    #[must_use]
    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> ConnectState {
        ConnectState { first: self.first.clone(), pointer: self.pointer, hover: self.hover.clone() }
    }
}

impl InteractionMode for ConnectMode {
    fn name(&self) -> ModeName {
        ModeName::Connect
    }

    fn cursor(&self) -> Cursor {
        if self.hover.is_some() { Cursor::Pointer } else { Cursor::Crosshair }
    }

    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, world: Point, event: &PointerEvent) -> ModeOutcome {
        if event.button != Button::Primary || !ctx.editing() {
            return ModeOutcome::Continue;
        }
        let scene = &mut *ctx.scene;
        let Some(hit) = scene.hit_test_point(world) else {
            return ModeOutcome::Continue;
        };

        let Some((body_a, anchor_a)) = self.first.take() else {
            scene.selection.select(hit.clone(), &mut scene.notifier);
            self.first = Some((hit, world));
            return ModeOutcome::Continue;
        };
        if body_a == hit {
            self.first = Some((body_a, anchor_a));
            return ModeOutcome::Continue;
        }

        match scene.connect(self.kind, &body_a, &hit, anchor_a, world) {
            Ok(id) => {
                debug!(%id, a = %body_a, b = %hit, "connected");
                scene.selection.select(id, &mut scene.notifier);
                self.clear();
                ModeOutcome::Done
            }
            Err(err) => {
                warn!(error = %err, "connect gesture aborted");
                self.clear();
                ModeOutcome::Continue
            }
        }
    }

    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, world: Point, _event: &PointerEvent) -> ModeOutcome {
        self.pointer = Some(world);
        self.hover = ctx.scene.hit_test_point(world);
        ModeOutcome::Continue
    }

    fn on_key_down(&mut self, _ctx: &mut ModeContext<'_>, key: &Key) -> ModeOutcome {
        if key.is_escape() {
            self.clear();
            return ModeOutcome::Done;
        }
        ModeOutcome::Continue
    }

    fn clear(&mut self) {
        self.first = None;
        self.pointer = None;
        self.hover = None;
    }
}
