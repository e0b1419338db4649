//! Shared numeric constants for the editor crate.

// ── Camera ──────────────────────────────────────────────────────

/// Default zoom in screen pixels per world meter.
pub const DEFAULT_ZOOM: f64 = 50.0;

/// Furthest zoom-out (~5 m scale bar).
pub const MIN_ZOOM: f64 = 10.0;

/// Closest zoom-in (~5 mm scale bar).
pub const MAX_ZOOM: f64 = 60_000.0;

/// Multiplicative zoom step per wheel notch.
pub const ZOOM_FACTOR: f64 = 1.15;

// ── Clock ───────────────────────────────────────────────────────

/// Upper bound on wall time fed into the accumulator per frame, in seconds.
pub const MAX_FRAME_DELTA_SECS: f64 = 0.1;

// ── Physics ─────────────────────────────────────────────────────

/// Default gravity, meters per second squared (Y-up world).
pub const DEFAULT_GRAVITY_Y: f64 = -9.81;

/// Finest fixed timestep accepted, in seconds.
pub const TIMESTEP_MIN: f64 = 1.0 / 240.0;

/// Coarsest fixed timestep accepted, in seconds.
pub const TIMESTEP_MAX: f64 = 1.0 / 10.0;

/// Fixed timestep used until the user picks another.
pub const TIMESTEP_DEFAULT: f64 = 1.0 / 60.0;

/// Velocity solver iterations per step.
pub const VELOCITY_ITERATIONS: usize = 8;

/// Position (stabilization) iterations per step.
pub const POSITION_ITERATIONS: usize = 3;

// ── Hit-testing ─────────────────────────────────────────────────

/// Half-size of the query box around a clicked point, in meters.
pub const POINT_QUERY_HALF_EXTENT: f64 = 0.01;

/// Perpendicular click tolerance for zero-thickness ground spans, in meters.
pub const EDGE_HIT_TOLERANCE: f64 = 0.15;

// ── Entity defaults ─────────────────────────────────────────────

/// Fill colors cycled through as primitives are created.
pub const PALETTE: [&str; 7] = ["#3b82f6", "#ef4444", "#22c55e", "#f59e0b", "#8b5cf6", "#ec4899", "#06b6d4"];

/// Ground spans always use this color.
pub const GROUND_COLOR: &str = "#64748b";
