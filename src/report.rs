//! Risk report boundary object and the sink's validation rules.
//!
//! The sink re-runs these checks server-side; they live here too so the agent
//! can verify its own payloads and so the accept/reject contract is testable
//! end to end. A rejection is a warning, never fatal to the pipeline.

use crate::detector::AnomalyScores;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload posted to the sink once per reporting interval. Numerical
/// aggregates and a session id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// Unix timestamp of the risk calculation (seconds)
    pub timestamp: f64,
    /// Smoothed risk score, 0–100
    pub risk_score: f64,
    pub anomaly_scores: AnomalyScores,
    /// UUID of the monitored session
    pub session_id: String,
    /// Producer tag (e.g. "live", "synthetic")
    pub source: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("risk score {0} out of range [0, 100]")]
    RiskScoreOutOfRange(f64),
    #[error("anomaly score {field}: {value} out of range [0, 100]")]
    AnomalyScoreOutOfRange { field: &'static str, value: f64 },
    #[error("risk score is zero but anomaly scores are non-zero")]
    InconsistentScores,
    #[error("session id is empty or missing")]
    EmptySessionId,
    #[error("invalid timestamp {0}")]
    InvalidTimestamp(f64),
}

impl RiskReport {
    pub fn new(
        timestamp: f64,
        risk_score: f64,
        anomaly_scores: AnomalyScores,
        session_id: String,
        source: String,
    ) -> Self {
        Self {
            timestamp,
            risk_score,
            anomaly_scores,
            session_id,
            source,
        }
    }

    /// The sink's plausibility checks: range bounds, score consistency,
    /// session id presence, timestamp sanity.
    pub fn validate(&self) -> Result<(), ReportError> {
        if !(0.0..=100.0).contains(&self.risk_score) {
            return Err(ReportError::RiskScoreOutOfRange(self.risk_score));
        }

        let s = &self.anomaly_scores;
        for (field, value) in [
            ("idle_burst", s.idle_burst),
            ("focus_instability", s.focus_instability),
            ("behavioral_drift", s.behavioral_drift),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ReportError::AnomalyScoreOutOfRange { field, value });
            }
        }

        if self.risk_score == 0.0
            && (s.idle_burst != 0.0 || s.focus_instability != 0.0 || s.behavioral_drift != 0.0)
        {
            return Err(ReportError::InconsistentScores);
        }

        if self.session_id.trim().is_empty() {
            return Err(ReportError::EmptySessionId);
        }

        if !self.timestamp.is_finite() || self.timestamp <= 0.0 {
            return Err(ReportError::InvalidTimestamp(self.timestamp));
        }

        Ok(())
    }
}
