//! Per-session pipeline: one polling tick from raw events to an optional
//! risk report.
//!
//! Each session owns independent instances of every component; nothing here is
//! shared across sessions, so concurrent sessions (as in a load harness) need
//! no synchronization.

use crate::baseline::BaselineBuilder;
use crate::config::AgentConfig;
use crate::detector::{ActivityShiftDetector, AnomalyScores};
use crate::events::Event;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::report::RiskReport;
use crate::risk::RiskEngine;
use tracing::info;
use uuid::Uuid;

pub struct SessionPipeline {
    session_id: String,
    source: String,
    report_interval_secs: f64,
    last_report_at: f64,
    extractor: FeatureExtractor,
    builder: BaselineBuilder,
    detector: ActivityShiftDetector,
    risk_engine: RiskEngine,
}

impl SessionPipeline {
    pub fn new(config: &AgentConfig, source: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            source: source.into(),
            report_interval_secs: config.uplink.report_interval_secs,
            last_report_at: 0.0,
            extractor: FeatureExtractor::new(&config.features),
            builder: BaselineBuilder::new(&config.calibration),
            detector: ActivityShiftDetector::new(config.detector.clone()),
            risk_engine: RiskEngine::new(config.risk.clone()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_calibrated(&self) -> bool {
        self.builder.is_calibrated()
    }

    pub fn calibration_progress(&self, now: f64) -> f64 {
        self.builder.calibration_progress(now)
    }

    pub fn current_risk(&self) -> f64 {
        self.risk_engine.current_risk()
    }

    pub fn explain(&self, scores: &AnomalyScores) -> String {
        self.detector.explain(scores)
    }

    /// One iteration of the polling loop: ingest events, compute features,
    /// feed calibration or detection, and emit a report when the reporting
    /// interval has elapsed. Returns `None` while calibrating or between
    /// reporting intervals.
    pub fn tick(&mut self, now: f64, events: Vec<Event>) -> Option<RiskReport> {
        for event in events {
            self.extractor.add_event(event);
        }
        let features: FeatureVector = self.extractor.compute_features(now);

        self.builder.update(&features, features.window_end);

        // Hand the frozen baseline to the detector exactly once
        if self.detector.baseline().is_none() {
            if let Some(profile) = self.builder.baseline() {
                info!(session_id = %self.session_id, "baseline calibrated");
                self.detector.set_baseline(profile);
            }
        }

        if self.detector.baseline().is_none() {
            return None;
        }

        let scores = self.detector.compute_scores(&features);
        let risk = self.risk_engine.compute_risk(&scores);

        if now - self.last_report_at >= self.report_interval_secs {
            self.last_report_at = now;
            return Some(RiskReport::new(
                now,
                risk,
                scores,
                self.session_id.clone(),
                self.source.clone(),
            ));
        }
        None
    }

    /// Start the session over: new id, empty buffers, fresh calibration.
    pub fn reset(&mut self) {
        self.session_id = Uuid::new_v4().to_string();
        self.last_report_at = 0.0;
        self.extractor.clear();
        self.builder.reset();
        self.detector.clear_baseline();
        self.risk_engine.reset();
    }
}
