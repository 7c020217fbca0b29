//! Activity shift detection: three independent deviation rules against the
//! frozen baseline.
//!
//! - Idle burst: long idle followed by a typing burst (paste-like behavior)
//! - Focus instability: excessive window/tab switching
//! - Behavioral drift: typing speed far from the calibrated norm
//!
//! Each rule yields a score in `[0, scale]`; the overall score is the maximum
//! of the three (worst-case detection).

use crate::baseline::BaselineProfile;
use crate::config::DetectorConfig;
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Per-rule anomaly scores plus their maximum. 0–30 normal, 30–60 suspicious,
/// above 60 high-risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScores {
    pub idle_burst: f64,
    pub focus_instability: f64,
    pub behavioral_drift: f64,
    pub overall: f64,
}

/// Compares live feature vectors against the baseline profile.
pub struct ActivityShiftDetector {
    config: DetectorConfig,
    baseline: Option<BaselineProfile>,
}

impl ActivityShiftDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            baseline: None,
        }
    }

    pub fn baseline(&self) -> Option<&BaselineProfile> {
        self.baseline.as_ref()
    }

    /// Drop the reference profile; detection goes inert until a new session
    /// calibrates.
    pub fn clear_baseline(&mut self) {
        self.baseline = None;
    }

    /// Install the frozen baseline; detection is inert until this happens.
    pub fn set_baseline(&mut self, baseline: BaselineProfile) {
        info!(
            typing = baseline.avg_typing_speed,
            idle = baseline.avg_idle_duration,
            focus_rate = baseline.avg_focus_rate,
            "detector baseline set"
        );
        self.baseline = Some(baseline);
    }

    /// Evaluate all three rules. Without a baseline there is no reference to
    /// deviate from, so all scores are zero.
    pub fn compute_scores(&self, features: &FeatureVector) -> AnomalyScores {
        let baseline = match &self.baseline {
            Some(b) => b,
            None => return AnomalyScores::default(),
        };

        let mut scores = AnomalyScores {
            idle_burst: self.detect_idle_burst(features, baseline),
            focus_instability: self.detect_focus_instability(features, baseline),
            behavioral_drift: self.detect_behavioral_drift(features, baseline),
            overall: 0.0,
        };
        scores.overall = scores
            .idle_burst
            .max(scores.focus_instability)
            .max(scores.behavioral_drift);

        if scores.overall > 60.0 {
            warn!(
                overall = scores.overall,
                idle_burst = scores.idle_burst,
                focus = scores.focus_instability,
                drift = scores.behavioral_drift,
                "high-risk anomaly"
            );
        } else if scores.overall > 30.0 {
            debug!(overall = scores.overall, "suspicious activity");
        }
        scores
    }

    /// Rule A: idle duration and typing speed both well above baseline.
    /// Score scales with how extreme the typing burst is:
    /// `(speed_ratio - typing_multiplier) * 100`, capped at `idle_scale`.
    fn detect_idle_burst(&self, features: &FeatureVector, baseline: &BaselineProfile) -> f64 {
        let idle_threshold = baseline.avg_idle_duration * self.config.idle_multiplier;
        if features.avg_idle_duration <= idle_threshold {
            return 0.0;
        }
        let typing_threshold = baseline.avg_typing_speed * self.config.typing_multiplier;
        if features.avg_typing_speed <= typing_threshold {
            return 0.0;
        }
        let ratio = features.avg_typing_speed / baseline.avg_typing_speed;
        let raw = (ratio - self.config.typing_multiplier) * 100.0;
        raw.clamp(0.0, self.config.idle_scale)
    }

    /// Rule B: focus-loss rate (per minute) well above baseline.
    /// Score is `(rate_ratio - focus_multiplier) * 70`, capped at `focus_scale`.
    fn detect_focus_instability(
        &self,
        features: &FeatureVector,
        baseline: &BaselineProfile,
    ) -> f64 {
        let window_len = features.window_len();
        let focus_rate = if window_len > 0.0 {
            features.focus_loss_count as f64 * (60.0 / window_len)
        } else {
            0.0
        };

        let threshold = baseline.avg_focus_rate * self.config.focus_multiplier;
        if focus_rate <= threshold || baseline.avg_focus_rate <= 0.0 {
            return 0.0;
        }
        let ratio = focus_rate / baseline.avg_focus_rate;
        let raw = (ratio - self.config.focus_multiplier) * 70.0;
        raw.clamp(0.0, self.config.focus_scale)
    }

    /// Rule C: absolute typing-speed deviation beyond the drift threshold.
    /// Score is `(deviation_pct - drift_threshold) * 200`, capped at `drift_scale`.
    fn detect_behavioral_drift(
        &self,
        features: &FeatureVector,
        baseline: &BaselineProfile,
    ) -> f64 {
        if baseline.avg_typing_speed <= 0.0 {
            return 0.0;
        }
        let deviation_pct = (features.avg_typing_speed - baseline.avg_typing_speed).abs()
            / baseline.avg_typing_speed;
        if deviation_pct <= self.config.drift_threshold {
            return 0.0;
        }
        let raw = (deviation_pct - self.config.drift_threshold) * 200.0;
        raw.clamp(0.0, self.config.drift_scale)
    }

    /// Human-readable account of what tripped, for dashboards and alert logs.
    /// Purely descriptive; never drives control flow.
    pub fn explain(&self, scores: &AnomalyScores) -> String {
        let mut parts: Vec<&str> = Vec::new();

        if scores.idle_burst > 60.0 {
            parts.push("CRITICAL: extreme typing burst after idle - possible paste");
        } else if scores.idle_burst > 30.0 {
            parts.push("WARNING: unusual typing pattern after idle");
        }
        if scores.focus_instability > 60.0 {
            parts.push("CRITICAL: excessive window/tab switching");
        } else if scores.focus_instability > 30.0 {
            parts.push("WARNING: frequent focus changes");
        }
        if scores.behavioral_drift > 60.0 {
            parts.push("CRITICAL: typing speed drastically changed");
        } else if scores.behavioral_drift > 30.0 {
            parts.push("WARNING: typing pattern shifted");
        }

        if parts.is_empty() {
            "Normal behavior detected".to_string()
        } else {
            parts.join(" | ")
        }
    }
}
