//! Behavioral feature aggregation over a sliding window of timing events.

mod extractor;

pub use extractor::FeatureExtractor;

use serde::{Deserialize, Serialize};

/// Aggregate snapshot of one sliding window. A plain value type: produced
/// fresh per query, never mutated, no identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Keystrokes per minute
    pub avg_typing_speed: f64,
    /// Mean idle duration in the window (seconds)
    pub avg_idle_duration: f64,
    /// Focus-lost events in the window
    pub focus_loss_count: u32,
    /// Pixels per second across consecutive mouse samples
    pub avg_mouse_speed: f64,
    /// Mean press-to-press gap (seconds)
    pub inter_key_interval: f64,
    /// Key presses in the window
    pub key_press_count: u32,
    pub window_start: f64,
    pub window_end: f64,
}

impl FeatureVector {
    /// Window length in seconds.
    pub fn window_len(&self) -> f64 {
        self.window_end - self.window_start
    }

    /// Whether this window shows any typing signal at all.
    pub fn has_typing(&self) -> bool {
        self.avg_typing_speed > 0.0 || self.key_press_count > 0
    }
}
