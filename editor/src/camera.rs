//! Viewport transform: pan/zoom camera and screen↔world conversions.
//!
//! The world is Y-up and measured in meters. The screen is Y-down and measured
//! in CSS pixels, with the world origin drawn at the viewport center shifted by
//! the pan offset.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_FACTOR};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Camera state for pan/zoom over the world.
///
/// `offset_x` / `offset_y` are in screen pixels.
/// `zoom` is screen pixels per world meter.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub offset_x: f64,
    pub offset_y: f64,
    pub zoom: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, zoom: DEFAULT_ZOOM, viewport_width: 0.0, viewport_height: 0.0 }
    }
}

impl Camera {
    /// Record the current viewport size in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    fn center(&self) -> Point {
        Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Convert a world-space point (meters, Y-up) to screen coordinates (pixels, Y-down).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let c = self.center();
        Point {
            x: world.x * self.zoom + self.offset_x + c.x,
            y: -world.y * self.zoom + self.offset_y + c.y,
        }
    }

    /// Convert a screen-space point (pixels, Y-down) to world coordinates (meters, Y-up).
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let c = self.center();
        Point {
            x: (screen.x - c.x - self.offset_x) / self.zoom,
            y: -(screen.y - c.y - self.offset_y) / self.zoom,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Pan by a screen-space pixel delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Zoom one step in or out while keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, zoom_in: bool) {
        let factor = if zoom_in { ZOOM_FACTOR } else { 1.0 / ZOOM_FACTOR };
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_zoom / self.zoom;

        let c = self.center();
        self.offset_x = (self.offset_x + c.x - anchor.x) * ratio + anchor.x - c.x;
        self.offset_y = (self.offset_y + c.y - anchor.y) * ratio + anchor.y - c.y;
        self.zoom = new_zoom;
    }

    /// Return to the default pan and zoom. The viewport size is kept.
    pub fn reset(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.zoom = DEFAULT_ZOOM;
    }
}
