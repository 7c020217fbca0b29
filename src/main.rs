//! Sentinel agent entrypoint: a single-session daemon loop. Each tick drains
//! the event listener with a bounded wait, runs the pipeline, and posts any
//! resulting risk report; Ctrl+C stops the loop after its current tick.
//!
//! The shipped binary runs against the synthetic event generator; real OS
//! capture is an external producer behind the same listener trait.

use sentinel_agent::{
    config::AgentConfig,
    events::{now_secs, EventListener, MockListener, MockListenerConfig},
    logging::StructuredLogger,
    session::SessionPipeline,
    uplink::UplinkClient,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("SENTINEL_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = AgentConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let mut session = SessionPipeline::new(&config, "synthetic");
    info!(session_id = %session.session_id(), "sentinel agent starting");

    let uplink = UplinkClient::new(&config.uplink);
    if uplink.is_none() {
        info!("uplink disabled (no endpoint configured); reports are logged only");
    }

    let mut listener = MockListener::new(MockListenerConfig::default());
    listener.start();

    static STOP: AtomicBool = AtomicBool::new(false);
    ctrlc::set_handler(|| {
        STOP.store(true, Ordering::Relaxed);
    })?;

    let drain_timeout = Duration::from_secs_f64(config.features.drain_timeout_secs);
    let tick = Duration::from_secs_f64(config.features.tick_secs);
    let mut was_calibrated = false;

    info!(tick_secs = config.features.tick_secs, "monitoring started (Ctrl+C to stop)");
    while !STOP.load(Ordering::Relaxed) {
        let events = listener.drain(drain_timeout);
        let now = now_secs();

        if let Some(report) = session.tick(now, events) {
            if let Err(e) = report.validate() {
                warn!(error = %e, "report failed local validation; dropped");
            } else {
                info!(
                    risk = report.risk_score,
                    overall = report.anomaly_scores.overall,
                    detail = %session.explain(&report.anomaly_scores),
                    "risk report"
                );
                if let Some(u) = &uplink {
                    u.post_report(&report);
                }
            }
        }

        if !was_calibrated {
            if session.is_calibrated() {
                was_calibrated = true;
            } else {
                info!(
                    progress_pct = session.calibration_progress(now),
                    "calibrating baseline"
                );
            }
        }

        std::thread::sleep(tick);
    }

    listener.stop();
    info!(
        session_id = %session.session_id(),
        final_risk = session.current_risk(),
        "sentinel agent stopping"
    );
    Ok(())
}
