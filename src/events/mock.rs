//! Synthetic event generator: plausible interaction patterns without OS hooks.
//! Useful for development, load harnesses, and running the agent where
//! capture permissions are unavailable. Not a substitute for real capture.

use super::{now_secs, Event, EventKind, EventListener};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MockListenerConfig {
    /// Mean gap between generated events (seconds, exponential)
    pub mean_event_interval: f64,
    /// Chance per cycle of opening an idle period
    pub idle_probability: f64,
    /// Chance a generated event is a focus flip
    pub focus_loss_probability: f64,
    /// Chance a generated event is a typing burst
    pub typing_burst_probability: f64,
}

impl Default for MockListenerConfig {
    fn default() -> Self {
        Self {
            mean_event_interval: 0.2,
            idle_probability: 0.15,
            focus_loss_probability: 0.02,
            typing_burst_probability: 0.3,
        }
    }
}

pub struct MockListener {
    config: MockListenerConfig,
    rx: Option<Receiver<Event>>,
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl MockListener {
    pub fn new(config: MockListenerConfig) -> Self {
        Self {
            config,
            rx: None,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    fn generate(config: MockListenerConfig, tx: Sender<Event>, running: Arc<AtomicBool>) {
        let mut rng = rand::thread_rng();
        let mut in_idle = false;
        let mut idle_start = 0.0f64;

        while running.load(Ordering::Relaxed) {
            let now = now_secs();

            if in_idle {
                // 30% chance per cycle to exit idle; generate nothing while idle
                if rng.gen::<f64>() < 0.3 {
                    in_idle = false;
                    let duration = now - idle_start;
                    let _ = tx.send(Event::new(now, EventKind::IdleEnd { duration }));
                    debug!(duration, "mock idle ended");
                } else {
                    std::thread::sleep(Duration::from_millis(100));
                }
                continue;
            }

            if rng.gen::<f64>() < config.idle_probability * 0.1 {
                in_idle = true;
                idle_start = now;
                let _ = tx.send(Event::new(now, EventKind::IdlePeriod { duration: 0.0 }));
                std::thread::sleep(Duration::from_millis(100));
                continue;
            }

            let roll: f64 = rng.gen();
            if roll < config.typing_burst_probability {
                let keys = rng.gen_range(1..=5);
                for i in 0..keys {
                    let press = now + i as f64 * rng.gen_range(0.05..0.15);
                    let release = press + rng.gen_range(0.05..0.10);
                    let _ = tx.send(Event::new(press, EventKind::KeyPress));
                    let _ = tx.send(Event::new(release, EventKind::KeyRelease));
                }
            } else if roll < config.typing_burst_probability + 0.3 {
                let x = rng.gen_range(0..1920);
                let y = rng.gen_range(0..1080);
                let _ = tx.send(Event::new(now, EventKind::MouseMove { x, y }));
            } else if roll < config.typing_burst_probability + 0.5 {
                let x = rng.gen_range(0..1920);
                let y = rng.gen_range(0..1080);
                let _ = tx.send(Event::new(now, EventKind::MouseClick { x, y }));
            } else if roll < config.typing_burst_probability + 0.5 + config.focus_loss_probability
            {
                let _ = tx.send(Event::new(now, EventKind::FocusLost));
            } else {
                let _ = tx.send(Event::new(now, EventKind::FocusGained));
            }

            // Exponential inter-event gap around the configured mean
            let u: f64 = rng.gen_range(f64::EPSILON..1.0);
            let gap = -u.ln() * config.mean_event_interval;
            std::thread::sleep(Duration::from_secs_f64(gap.min(1.0)));
        }
    }
}

impl EventListener for MockListener {
    fn start(&mut self) {
        if self.running.load(Ordering::Relaxed) {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.running.store(true, Ordering::Relaxed);
        let config = self.config.clone();
        let running = Arc::clone(&self.running);
        self.handle = Some(std::thread::spawn(move || {
            Self::generate(config, tx, running);
        }));
        debug!("mock listener started");
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
        self.rx = None;
        debug!("mock listener stopped");
    }

    fn drain(&mut self, timeout: Duration) -> Vec<Event> {
        let mut out = Vec::new();
        let rx = match self.rx.as_ref() {
            Some(rx) => rx,
            None => return out,
        };
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(r) if !r.is_zero() => r,
                _ => break,
            };
            match rx.recv_timeout(remaining) {
                Ok(ev) => out.push(ev),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        out
    }
}

impl Drop for MockListener {
    fn drop(&mut self) {
        self.stop();
    }
}
