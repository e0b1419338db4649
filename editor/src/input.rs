//! Input model: modifier keys, pointer buttons, keys, and cursor styles.
//!
//! Host events arrive in screen space. The interaction manager converts them
//! to world space before handing them to the active mode, so modes receive
//! both coordinates alongside the [`PointerEvent`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held. Extends selections.
    pub shift: bool,
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button. Always pans.
    Middle,
    Secondary,
}

/// A keyboard key, named as the host platform reports it (`"Escape"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    /// The space bar, which arms primary-button panning while held.
    #[must_use]
    pub fn is_space(&self) -> bool {
        matches!(self.0.as_str(), " " | "Space" | "Spacebar")
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelDelta {
    pub dx: f64,
    /// Vertical scroll in pixels (positive = down, which zooms out).
    pub dy: f64,
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    /// Position in screen pixels.
    pub screen: Point,
    pub button: Button,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn new(screen: Point, button: Button, modifiers: Modifiers) -> Self {
        Self { screen, button, modifiers }
    }

    /// Primary-button event with no modifiers.
    #[must_use]
    pub fn primary(screen: Point) -> Self {
        Self::new(screen, Button::Primary, Modifiers::default())
    }
}

/// Cursor style hint for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Grab,
    Grabbing,
    Pointer,
}

impl Cursor {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Pointer => "pointer",
        }
    }
}
