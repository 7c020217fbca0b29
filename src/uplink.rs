//! Uplink client: post risk reports to the collection API.
//! Fire-and-forget with short timeouts; a failed or rejected post is logged
//! and dropped, and the next cycle reports fresh data instead of retrying.

use crate::config::UplinkConfig;
use crate::report::RiskReport;
use std::time::Duration;
use tracing::{debug, warn};

pub struct UplinkClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl UplinkClient {
    /// Build the client if an endpoint is configured; `None` disables uplink.
    pub fn new(config: &UplinkConfig) -> Option<Self> {
        let endpoint = config.endpoint.as_ref()?.trim_end_matches('/');
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;
        Some(Self {
            client,
            base_url: endpoint.to_string(),
        })
    }

    /// Post one report. All failure modes (transport error, timeout, non-2xx
    /// including sink-side validation rejection) reduce to a warning.
    pub fn post_report(&self, report: &RiskReport) {
        let url = format!("{}/risk", self.base_url);
        match self.client.post(&url).json(report).send() {
            Ok(res) if res.status().is_success() => {
                debug!(risk = report.risk_score, "risk report posted");
            }
            Ok(res) => {
                let status = res.status();
                let body = res.text().unwrap_or_default();
                warn!(%status, body, "sink rejected risk report");
            }
            Err(e) => {
                warn!(error = %e, "risk report dropped (sink unreachable)");
            }
        }
    }
}
