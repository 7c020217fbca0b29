//! Risk scoring: weighted combination of anomaly scores plus temporal smoothing.

mod engine;

pub use engine::RiskEngine;
