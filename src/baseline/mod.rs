//! Baseline calibration: observe feature vectors for the opening phase of a
//! session, then freeze an immutable reference profile.
//!
//! The builder is an explicit state machine
//! (`Uninitialized → Calibrating → Calibrated`); a frozen profile is never
//! recomputed within a session.

use crate::config::CalibrationConfig;
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Typing speed above this counts as real typing evidence (keys/min).
const TYPING_SPEED_FLOOR: f64 = 5.0;
/// Key-press count above this counts as real typing evidence.
const KEY_PRESS_FLOOR: u32 = 2;
/// With at least this many samples, a typing-free history still calibrates.
const NO_TYPING_SAMPLE_FLOOR: usize = 10;
/// Window length assumed when a sample carries a degenerate window (seconds).
const FALLBACK_WINDOW_SECS: f64 = 30.0;

/// Frozen snapshot of a session's "normal" behavior. Numerical aggregates
/// only; created exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineProfile {
    /// Keystrokes per minute
    pub avg_typing_speed: f64,
    /// Seconds per idle period
    pub avg_idle_duration: f64,
    /// Focus losses per minute
    pub avg_focus_rate: f64,
}

impl BaselineProfile {
    /// Profile used when calibration times out with no observations at all.
    pub fn fallback() -> Self {
        Self {
            avg_typing_speed: 150.0,
            avg_idle_duration: 2.0,
            avg_focus_rate: 0.5,
        }
    }
}

enum CalibrationState {
    Uninitialized,
    Calibrating {
        started_at: f64,
        history: Vec<FeatureVector>,
    },
    Calibrated(BaselineProfile),
}

/// Accumulates feature vectors during calibration and freezes the baseline
/// once convergence criteria are met.
pub struct BaselineBuilder {
    duration_secs: f64,
    min_samples: usize,
    state: CalibrationState,
}

impl BaselineBuilder {
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            duration_secs: config.duration_secs,
            min_samples: config.min_samples,
            state: CalibrationState::Uninitialized,
        }
    }

    /// Begin a new calibration period anchored at `start_time`. Any previous
    /// baseline and history are discarded.
    pub fn start_calibration(&mut self, start_time: f64) {
        self.state = CalibrationState::Calibrating {
            started_at: start_time,
            history: Vec::new(),
        };
        info!(start_time, "calibration started");
    }

    /// Feed one feature vector. No-op once calibrated; implicitly starts
    /// calibration on the first call. The baseline freezes early once enough
    /// samples, enough elapsed time, and some typing evidence have all
    /// accumulated, or unconditionally once the calibration window elapses.
    pub fn update(&mut self, features: &FeatureVector, now: f64) {
        let (started_at, history) = match &mut self.state {
            CalibrationState::Calibrated(_) => return,
            CalibrationState::Uninitialized => {
                self.start_calibration(now);
                return;
            }
            CalibrationState::Calibrating {
                started_at,
                history,
            } => (*started_at, history),
        };

        let elapsed = now - started_at;
        if elapsed <= self.duration_secs {
            history.push(features.clone());
            debug!(elapsed, samples = history.len(), "calibration sample");

            let enough_samples = history.len() >= self.min_samples;
            let half_elapsed = elapsed >= self.duration_secs * 0.5;
            if enough_samples && half_elapsed && Self::has_typing_evidence(history) {
                self.try_build();
            }
        } else {
            // Window elapsed: finalize with whatever was observed
            self.try_build();
        }
    }

    fn has_typing_evidence(history: &[FeatureVector]) -> bool {
        history.iter().any(|fv| {
            fv.avg_typing_speed > TYPING_SPEED_FLOOR || fv.key_press_count > KEY_PRESS_FLOOR
        })
    }

    /// Attempt to freeze the baseline from the accumulated history. Defers
    /// (stays Calibrating) when the history has typing-free samples but too
    /// few of them to trust.
    fn try_build(&mut self) {
        let history = match &mut self.state {
            CalibrationState::Calibrating { history, .. } => history,
            _ => return,
        };

        if history.is_empty() {
            warn!("no feature history at finalization; using fallback baseline");
            self.state = CalibrationState::Calibrated(BaselineProfile::fallback());
            return;
        }

        let valid_count = history.iter().filter(|fv| fv.has_typing()).count();
        let use_all = if valid_count == 0 {
            if history.len() >= NO_TYPING_SAMPLE_FLOOR {
                warn!(
                    samples = history.len(),
                    "no typing observed during calibration; using all samples"
                );
                true
            } else {
                debug!(
                    samples = history.len(),
                    "no typing evidence and too few samples; calibration continues"
                );
                return;
            }
        } else {
            false
        };

        let valid: Vec<&FeatureVector> = history
            .iter()
            .filter(|fv| use_all || fv.has_typing())
            .collect();
        let n = valid.len() as f64;

        let avg_typing_speed = valid.iter().map(|fv| fv.avg_typing_speed).sum::<f64>() / n;
        let avg_idle_duration = valid.iter().map(|fv| fv.avg_idle_duration).sum::<f64>() / n;

        // Per-window focus losses normalized to a per-minute rate using the
        // first valid sample's window length
        let focus_per_window =
            valid.iter().map(|fv| fv.focus_loss_count as f64).sum::<f64>() / n;
        let mut window_secs = valid[0].window_len();
        if window_secs <= 0.0 {
            window_secs = FALLBACK_WINDOW_SECS;
        }
        let avg_focus_rate = focus_per_window * (60.0 / window_secs);

        let profile = BaselineProfile {
            avg_typing_speed,
            avg_idle_duration,
            avg_focus_rate,
        };
        info!(
            typing = profile.avg_typing_speed,
            idle = profile.avg_idle_duration,
            focus_rate = profile.avg_focus_rate,
            samples = history.len(),
            "baseline frozen"
        );
        // Freezing releases the history
        self.state = CalibrationState::Calibrated(profile);
    }

    /// The frozen profile, if calibration has finished.
    pub fn baseline(&self) -> Option<BaselineProfile> {
        match self.state {
            CalibrationState::Calibrated(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self.state, CalibrationState::Calibrated(_))
    }

    /// Calibration progress as a percentage of the configured duration.
    pub fn calibration_progress(&self, now: f64) -> f64 {
        match &self.state {
            CalibrationState::Uninitialized => 0.0,
            CalibrationState::Calibrated(_) => 100.0,
            CalibrationState::Calibrating { started_at, .. } => {
                let elapsed = now - started_at;
                ((elapsed / self.duration_secs) * 100.0).clamp(0.0, 100.0)
            }
        }
    }

    /// Discard baseline and history; returns to the uninitialized state.
    pub fn reset(&mut self) {
        self.state = CalibrationState::Uninitialized;
        info!("baseline builder reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(duration_secs: f64, min_samples: usize) -> BaselineBuilder {
        BaselineBuilder::new(&CalibrationConfig {
            duration_secs,
            min_samples,
        })
    }

    fn typing_sample(speed: f64, t: f64) -> FeatureVector {
        FeatureVector {
            avg_typing_speed: speed,
            avg_idle_duration: 2.0,
            focus_loss_count: 1,
            key_press_count: (speed / 2.0) as u32,
            window_start: t - 30.0,
            window_end: t,
            ..FeatureVector::default()
        }
    }

    fn empty_sample(t: f64) -> FeatureVector {
        FeatureVector {
            window_start: t - 30.0,
            window_end: t,
            ..FeatureVector::default()
        }
    }

    #[test]
    fn first_update_only_starts_calibration() {
        let mut b = builder(180.0, 5);
        assert_eq!(b.calibration_progress(0.0), 0.0);
        b.update(&typing_sample(100.0, 0.0), 0.0);
        assert!(!b.is_calibrated());
        assert_eq!(b.calibration_progress(90.0), 50.0);
    }

    #[test]
    fn early_convergence_needs_samples_time_and_typing() {
        let mut b = builder(100.0, 5);
        b.start_calibration(0.0);
        // 5 typing samples before the 50% mark: must not calibrate yet
        for i in 0..5 {
            b.update(&typing_sample(120.0, 10.0 + i as f64), 10.0 + i as f64);
        }
        assert!(!b.is_calibrated());
        // One more past the 50% mark freezes it
        b.update(&typing_sample(120.0, 60.0), 60.0);
        assert!(b.is_calibrated());
    }

    #[test]
    fn never_calibrates_early_with_fewer_than_min_samples() {
        let mut b = builder(100.0, 5);
        b.start_calibration(0.0);
        for t in [55.0, 60.0, 65.0, 70.0] {
            b.update(&typing_sample(120.0, t), t);
        }
        // Only 4 samples, even though time and typing criteria hold
        assert!(!b.is_calibrated());
    }

    #[test]
    fn no_typing_defers_until_timeout() {
        let mut b = builder(100.0, 5);
        b.start_calibration(0.0);
        for i in 0..8 {
            let t = 55.0 + i as f64;
            b.update(&empty_sample(t), t);
        }
        // 8 typing-free samples: early path never fires, forced build defers
        assert!(!b.is_calibrated());
        b.update(&empty_sample(101.0), 101.0);
        assert!(!b.is_calibrated());
    }

    #[test]
    fn ten_typing_free_samples_calibrate_at_timeout() {
        let mut b = builder(100.0, 5);
        b.start_calibration(0.0);
        for i in 0..10 {
            let t = 1.0 + i as f64;
            b.update(&empty_sample(t), t);
        }
        b.update(&empty_sample(101.0), 101.0);
        assert!(b.is_calibrated());
        let profile = b.baseline().unwrap();
        assert_eq!(profile.avg_typing_speed, 0.0);
    }

    #[test]
    fn timeout_with_empty_history_uses_fallback() {
        let mut b = builder(100.0, 5);
        b.start_calibration(0.0);
        b.update(&empty_sample(150.0), 150.0);
        assert!(b.is_calibrated());
        assert_eq!(b.baseline().unwrap(), BaselineProfile::fallback());
    }

    #[test]
    fn baseline_averages_only_typing_windows() {
        let mut b = builder(100.0, 3);
        b.start_calibration(0.0);
        b.update(&typing_sample(100.0, 51.0), 51.0);
        b.update(&empty_sample(52.0), 52.0);
        b.update(&typing_sample(200.0, 53.0), 53.0);
        assert!(b.is_calibrated());
        let profile = b.baseline().unwrap();
        // Mean over the two typing windows only
        assert!((profile.avg_typing_speed - 150.0).abs() < 1e-9);
        assert!((profile.avg_idle_duration - 2.0).abs() < 1e-9);
        // 1 focus loss per 30s window = 2/min
        assert!((profile.avg_focus_rate - 2.0).abs() < 1e-9);
    }

    #[test]
    fn frozen_baseline_ignores_further_updates() {
        let mut b = builder(100.0, 3);
        b.start_calibration(0.0);
        for t in [51.0, 52.0, 53.0] {
            b.update(&typing_sample(100.0, t), t);
        }
        let frozen = b.baseline().unwrap();
        b.update(&typing_sample(500.0, 60.0), 60.0);
        assert_eq!(b.baseline().unwrap(), frozen);
        assert_eq!(b.calibration_progress(60.0), 100.0);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut b = builder(100.0, 3);
        b.start_calibration(0.0);
        for t in [51.0, 52.0, 53.0] {
            b.update(&typing_sample(100.0, t), t);
        }
        assert!(b.is_calibrated());
        b.reset();
        assert!(!b.is_calibrated());
        assert_eq!(b.calibration_progress(1000.0), 0.0);
    }
}
