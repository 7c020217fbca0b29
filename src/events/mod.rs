//! Timing-only interaction events and the listener pull interface.
//! Events carry timestamps and motion/duration metadata; no content
//! (key characters, window titles) exists anywhere in this type.

mod mock;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use mock::{MockListener, MockListenerConfig};

/// Current wall-clock time as fractional Unix seconds, the timebase all
/// event timestamps and windows share.
pub fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1e6
}

/// One interaction event. Timestamps are seconds on a mostly-monotonic
/// wall clock; ordering beyond that is not guaranteed by producers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: f64,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    KeyPress,
    KeyRelease,
    MouseMove { x: i32, y: i32 },
    MouseClick { x: i32, y: i32 },
    MouseScroll { x: i32, y: i32 },
    FocusLost,
    FocusGained,
    /// Idle period opened; duration is 0 until the period closes
    IdlePeriod { duration: f64 },
    /// Idle period closed; duration is the measured gap
    IdleEnd { duration: f64 },
}

impl Event {
    pub fn new(timestamp: f64, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }

    /// Idle duration carried by this event, if it is an idle event.
    pub fn idle_duration(&self) -> Option<f64> {
        match self.kind {
            EventKind::IdlePeriod { duration } | EventKind::IdleEnd { duration } => Some(duration),
            _ => None,
        }
    }
}

/// Pull interface over the capture subsystem. The real OS-hook listener lives
/// outside this crate; the synthetic [`MockListener`] implements the same trait.
pub trait EventListener {
    fn start(&mut self);
    fn stop(&mut self);
    /// Collect whatever events arrived within `timeout`, then return.
    /// Never blocks past the deadline; an empty vec is a normal result.
    fn drain(&mut self, timeout: Duration) -> Vec<Event>;
}
