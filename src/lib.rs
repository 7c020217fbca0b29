//! Sentinel Agent — privacy-first behavioral risk monitoring.
//!
//! Infers a smoothed risk signal from a stream of timing-only interaction
//! events (keystroke timestamps, mouse motion, focus changes, idle periods).
//! No content is ever captured: no key characters, no window titles.
//!
//! Modular structure:
//! - [`events`] — Timing-only event types, listener trait, synthetic generator
//! - [`features`] — Sliding-window behavioral feature extraction
//! - [`baseline`] — Calibration state machine and frozen reference profile
//! - [`detector`] — Rule-based activity shift detection
//! - [`risk`] — Weighted, temporally smoothed risk scoring
//! - [`report`] — Boundary payload and sink validation rules
//! - [`session`] — Per-session polling pipeline
//! - [`uplink`] — Fire-and-forget report posting
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod events;
pub mod features;
pub mod baseline;
pub mod detector;
pub mod risk;
pub mod report;
pub mod session;
pub mod uplink;
pub mod logging;

pub use config::AgentConfig;
pub use events::{Event, EventKind, EventListener, MockListener};
pub use features::{FeatureExtractor, FeatureVector};
pub use baseline::{BaselineBuilder, BaselineProfile};
pub use detector::{ActivityShiftDetector, AnomalyScores};
pub use risk::RiskEngine;
pub use report::{ReportError, RiskReport};
pub use session::SessionPipeline;
pub use uplink::UplinkClient;
pub use logging::StructuredLogger;
