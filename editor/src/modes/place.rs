//! Place mode: ghost preview and single-click placement.

use tracing::debug;

use crate::camera::Point;
use crate::doc::PrimitiveKind;
use crate::input::{Button, Cursor, Key, PointerEvent};

use super::{InteractionMode, ModeContext, ModeName, ModeOutcome};

#[derive(Debug)]
pub struct PlaceMode {
    kind: PrimitiveKind,
    ghost: Option<Point>,
}

impl Default for PlaceMode {
    fn default() -> Self {
        Self { kind: PrimitiveKind::Rectangle, ghost: None }
    }
}

impl PlaceMode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose what the next click places.
    pub fn set_kind(&mut self, kind: PrimitiveKind) {
        self.kind = kind;
    }

    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// World position of the placement preview, once the pointer has moved.
    #[must_use]
    pub fn ghost(&self) -> Option<Point> {
        self.ghost
    }
}

impl InteractionMode for PlaceMode {
    fn name(&self) -> ModeName {
        ModeName::Place
    }

    fn cursor(&self) -> Cursor {
        Cursor::Crosshair
    }

    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, world: Point, event: &PointerEvent) -> ModeOutcome {
        if event.button != Button::Primary || !ctx.editing() {
            return ModeOutcome::Continue;
        }
        let scene = &mut *ctx.scene;
        let id = scene.add_primitive(self.kind, world);
        debug!(%id, x = world.x, y = world.y, "placed");
        scene.selection.select(id, &mut scene.notifier);
        self.ghost = None;
        ModeOutcome::Done
    }

    fn on_pointer_move(&mut self, _ctx: &mut ModeContext<'_>, world: Point, _event: &PointerEvent) -> ModeOutcome {
        self.ghost = Some(world);
        ModeOutcome::Continue
    }

    fn on_key_down(&mut self, _ctx: &mut ModeContext<'_>, key: &Key) -> ModeOutcome {
        if key.is_escape() {
            self.ghost = None;
            return ModeOutcome::Done;
        }
        ModeOutcome::Continue
    }

    fn clear(&mut self) {
        self.ghost = None;
    }
}
