//! Combines the three rule scores into one weighted risk value and smooths it
//! across recent history to damp short spikes.

use crate::config::RiskConfig;
use crate::detector::AnomalyScores;
use std::collections::VecDeque;
use tracing::{debug, warn};

pub struct RiskEngine {
    config: RiskConfig,
    history: VecDeque<f64>,
    last_raw: f64,
    last_smoothed: f64,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        let capacity = config.smoothing_window.max(1);
        Self {
            config,
            history: VecDeque::with_capacity(capacity),
            last_raw: 0.0,
            last_smoothed: 0.0,
        }
    }

    /// Weighted raw score, clamped to [0, 100], then smoothed: the newest raw
    /// sample carries 60% of the result, the mean of the prior history 40%.
    /// Deliberately recency-biased; not a plain moving average.
    pub fn compute_risk(&mut self, scores: &AnomalyScores) -> f64 {
        let raw = (self.config.weight_idle_burst * scores.idle_burst
            + self.config.weight_focus_instability * scores.focus_instability
            + self.config.weight_behavioral_drift * scores.behavioral_drift)
            .clamp(0.0, 100.0);
        self.last_raw = raw;

        self.history.push_back(raw);
        while self.history.len() > self.config.smoothing_window.max(1) {
            self.history.pop_front();
        }

        let smoothed = if self.history.len() == 1 {
            raw
        } else {
            let prior = self.history.len() - 1;
            let prior_mean: f64 =
                self.history.iter().take(prior).sum::<f64>() / prior as f64;
            0.6 * raw + 0.4 * prior_mean
        };
        self.last_smoothed = smoothed;

        if raw >= 60.0 {
            warn!(raw, smoothed, "high risk");
        } else {
            debug!(raw, smoothed, "risk updated");
        }
        smoothed
    }

    /// Most recent smoothed risk score.
    pub fn current_risk(&self) -> f64 {
        self.last_smoothed
    }

    /// Most recent raw (unsmoothed) risk score.
    pub fn raw_risk(&self) -> f64 {
        self.last_raw
    }

    /// Clear history and zero both cached values; used when a session restarts.
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_raw = 0.0;
        self.last_smoothed = 0.0;
    }
}
