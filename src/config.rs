//! Harness configuration from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

const DEFAULT_SECONDS: f64 = 5.0;
const DEFAULT_FPS: u32 = 60;
const DEFAULT_SPEED: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Snapshot to load instead of the built-in demo scene.
    pub scene: Option<PathBuf>,
    /// Wall-clock seconds of host frames to drive.
    pub seconds: f64,
    /// Host frame rate.
    pub fps: u32,
    /// Playback speed multiplier.
    pub speed: f64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { scene: None, seconds: DEFAULT_SECONDS, fps: DEFAULT_FPS, speed: DEFAULT_SPEED }
    }
}

impl HarnessConfig {
    /// Build the configuration from environment variables.
    ///
    /// - `LINKBENCH_SCENE`: snapshot JSON path (optional)
    /// - `LINKBENCH_SECONDS`: seconds of frames to drive (default 5)
    /// - `LINKBENCH_FPS`: host frame rate (default 60)
    /// - `LINKBENCH_SPEED`: playback speed multiplier (default 1.0)
    ///
    /// Invalid values are logged and replaced by their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let scene = lookup("LINKBENCH_SCENE").filter(|raw| !raw.trim().is_empty()).map(PathBuf::from);
        let seconds = env_parse(&lookup, "LINKBENCH_SECONDS", DEFAULT_SECONDS, |v: &f64| v.is_finite() && *v > 0.0);
        let fps = env_parse(&lookup, "LINKBENCH_FPS", DEFAULT_FPS, |v: &u32| *v > 0);
        let speed = env_parse(&lookup, "LINKBENCH_SPEED", DEFAULT_SPEED, |v: &f64| v.is_finite() && *v > 0.0);
        Self { scene, seconds, fps, speed }
    }

    /// Host frames to drive. The first frame only starts the clock.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_count(&self) -> u32 {
        (self.seconds * f64::from(self.fps)).ceil() as u32 + 1
    }
}

fn env_parse<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!(key, raw = %raw, "invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
