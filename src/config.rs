//! Agent configuration. Every window, threshold, and weight the pipeline uses
//! is externally overridable; defaults are the tuned values of the detection rules.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Sliding-window feature extraction parameters
    pub features: FeaturesConfig,
    /// Baseline calibration parameters
    pub calibration: CalibrationConfig,
    /// Anomaly rule thresholds and scales
    pub detector: DetectorConfig,
    /// Risk weighting and smoothing
    pub risk: RiskConfig,
    /// Uplink: where and how often risk reports are posted
    pub uplink: UplinkConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Trailing window over which features are aggregated (seconds)
    pub window_secs: f64,
    /// Polling tick driving feature computation (seconds)
    pub tick_secs: f64,
    /// Bounded wait when draining the event listener (seconds)
    pub drain_timeout_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Length of the baseline observation period (seconds)
    pub duration_secs: f64,
    /// Minimum feature samples before the baseline may freeze early
    pub min_samples: usize,
}

/// Thresholds and score scales for the three detection rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Idle duration must exceed baseline by this factor (idle-burst rule)
    pub idle_multiplier: f64,
    /// Typing speed must exceed baseline by this factor (idle-burst rule)
    pub typing_multiplier: f64,
    /// Focus rate must exceed baseline by this factor (focus-instability rule)
    pub focus_multiplier: f64,
    /// Relative typing-speed deviation that trips the drift rule
    pub drift_threshold: f64,
    /// Per-rule score caps
    pub idle_scale: f64,
    pub focus_scale: f64,
    pub drift_scale: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub weight_idle_burst: f64,
    pub weight_focus_instability: f64,
    pub weight_behavioral_drift: f64,
    /// Number of recent raw scores kept for smoothing
    pub smoothing_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkConfig {
    /// Endpoint base URL; uplink is disabled when absent
    pub endpoint: Option<String>,
    /// Seconds between risk reports
    pub report_interval_secs: f64,
    /// Request timeout (seconds); reports are dropped on expiry
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            features: FeaturesConfig::default(),
            calibration: CalibrationConfig::default(),
            detector: DetectorConfig::default(),
            risk: RiskConfig::default(),
            uplink: UplinkConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            window_secs: 30.0,
            tick_secs: 1.0,
            drain_timeout_secs: 0.5,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            duration_secs: 180.0,
            min_samples: 5,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            idle_multiplier: 1.2,
            typing_multiplier: 1.3,
            focus_multiplier: 1.5,
            drift_threshold: 0.3,
            idle_scale: 70.0,
            focus_scale: 70.0,
            drift_scale: 70.0,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weight_idle_burst: 0.4,
            weight_focus_instability: 0.35,
            weight_behavioral_drift: 0.25,
            smoothing_window: 3,
        }
    }
}

impl Default for UplinkConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            report_interval_secs: 5.0,
            timeout_secs: 2,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl AgentConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<AgentConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
