//! Canvas-wide tuning constants.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scroll and interaction tuning for a canvas. Per-node scroll settings such
/// as the deceleration rate live on the node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Pixels scrolled per wheel unit.
    pub wheel_scroll_speed: f64,
    /// Pointer travel in pixels before a press becomes a drag scroll.
    pub drag_scroll_threshold: f64,
    /// Inertial velocity below which scrolling stops, in pixels per second.
    pub velocity_stop_threshold: f64,
    /// Applied per-frame movement below which inertia is considered blocked.
    pub applied_delta_epsilon: f64,
    /// Proportional return speed of rubber-band overscroll, per second.
    pub rubber_band_return_speed: f64,
    /// Remaining overscroll below which the offset snaps into range.
    pub rubber_band_snap_threshold: f64,
    /// Factor applied to drag movement that pushes further out of range.
    pub rubber_band_drag_resistance: f64,
    /// Weight of the newest sample in the smoothed drag velocity.
    pub velocity_smoothing: f64,
    /// Layout re-runs allowed per node while the scroll clamp keeps moving the
    /// offset. A final layout always follows the last clamp.
    pub max_settle_passes: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            wheel_scroll_speed: 40.0,
            drag_scroll_threshold: 8.0,
            velocity_stop_threshold: 1.0,
            applied_delta_epsilon: 1e-4,
            rubber_band_return_speed: 12.0,
            rubber_band_snap_threshold: 0.5,
            rubber_band_drag_resistance: 0.5,
            velocity_smoothing: 0.3,
            max_settle_passes: 4,
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON object of overrides. Missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
