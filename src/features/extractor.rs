//! Sliding-window extractor: ordered event buffer → feature vector.

use super::FeatureVector;
use crate::config::FeaturesConfig;
use crate::events::{Event, EventKind};
use std::collections::VecDeque;
use tracing::trace;

/// Maintains a time-pruned, timestamp-ordered buffer of events and computes
/// aggregate features over the trailing window on request.
pub struct FeatureExtractor {
    window_secs: f64,
    buffer: VecDeque<Event>,
}

impl FeatureExtractor {
    pub fn new(config: &FeaturesConfig) -> Self {
        Self {
            window_secs: config.window_secs,
            buffer: VecDeque::new(),
        }
    }

    /// Insert an event preserving timestamp order. The common case (timestamp
    /// at or past the buffer tail) is an O(1) append; rare out-of-order
    /// arrivals are placed by binary search. Nothing is rejected; duplicate
    /// timestamps are kept as delivered.
    pub fn add_event(&mut self, event: Event) {
        match self.buffer.back() {
            Some(last) if event.timestamp < last.timestamp => {
                let idx = self
                    .buffer
                    .partition_point(|e| e.timestamp <= event.timestamp);
                self.buffer.insert(idx, event);
            }
            _ => self.buffer.push_back(event),
        }
    }

    /// Number of buffered events (post last prune).
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Reset the event buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn prune(&mut self, now: f64) {
        let cutoff = now - self.window_secs;
        while self
            .buffer
            .front()
            .is_some_and(|e| e.timestamp < cutoff)
        {
            self.buffer.pop_front();
        }
    }

    /// Compute the feature vector for the window ending at `now`. Pruning is
    /// destructive: events that age out are gone. Always returns a vector;
    /// an empty buffer yields all zeros.
    pub fn compute_features(&mut self, now: f64) -> FeatureVector {
        self.prune(now);

        let mut fv = FeatureVector {
            window_start: now - self.window_secs,
            window_end: now,
            ..FeatureVector::default()
        };

        let mut press_timestamps: Vec<f64> = Vec::new();
        let mut idle_durations: Vec<f64> = Vec::new();
        let mut mouse_samples: Vec<(f64, i32, i32)> = Vec::new();

        for ev in &self.buffer {
            match ev.kind {
                EventKind::KeyPress => press_timestamps.push(ev.timestamp),
                EventKind::IdlePeriod { duration } | EventKind::IdleEnd { duration } => {
                    idle_durations.push(duration)
                }
                EventKind::FocusLost => fv.focus_loss_count += 1,
                EventKind::MouseMove { x, y } => mouse_samples.push((ev.timestamp, x, y)),
                _ => {}
            }
        }

        fv.key_press_count = press_timestamps.len() as u32;
        if press_timestamps.len() >= 2 {
            let gaps: f64 = press_timestamps
                .windows(2)
                .map(|w| w[1] - w[0])
                .sum();
            fv.inter_key_interval = gaps / (press_timestamps.len() - 1) as f64;

            let window_len = now - fv.window_start;
            if window_len > 0.0 {
                fv.avg_typing_speed = (press_timestamps.len() as f64 / window_len) * 60.0;
            }
        }

        if !idle_durations.is_empty() {
            fv.avg_idle_duration =
                idle_durations.iter().sum::<f64>() / idle_durations.len() as f64;
        }

        if mouse_samples.len() >= 2 {
            let total_distance: f64 = mouse_samples
                .windows(2)
                .map(|w| {
                    let dx = (w[1].1 - w[0].1) as f64;
                    let dy = (w[1].2 - w[0].2) as f64;
                    (dx * dx + dy * dy).sqrt()
                })
                .sum();
            let span = mouse_samples[mouse_samples.len() - 1].0 - mouse_samples[0].0;
            if span > 0.0 {
                fv.avg_mouse_speed = total_distance / span;
            }
        }

        trace!(
            presses = fv.key_press_count,
            typing = fv.avg_typing_speed,
            idle = fv.avg_idle_duration,
            focus = fv.focus_loss_count,
            "features computed"
        );
        fv
    }
}
