//! Pipeline benchmark: events → sliding-window features → anomaly scores.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sentinel_agent::baseline::BaselineProfile;
use sentinel_agent::config::{DetectorConfig, FeaturesConfig};
use sentinel_agent::detector::ActivityShiftDetector;
use sentinel_agent::events::{Event, EventKind};
use sentinel_agent::features::{FeatureExtractor, FeatureVector};

fn make_events(n: usize, start: f64) -> Vec<Event> {
    (0..n)
        .map(|i| {
            let t = start + i as f64 * 0.01;
            let kind = match i % 5 {
                0 => EventKind::KeyPress,
                1 => EventKind::KeyRelease,
                2 => EventKind::MouseMove {
                    x: (i % 1920) as i32,
                    y: (i % 1080) as i32,
                },
                3 => EventKind::FocusLost,
                _ => EventKind::FocusGained,
            };
            Event::new(t, kind)
        })
        .collect()
}

fn bench_feature_extraction(c: &mut Criterion) {
    let events = make_events(1000, 1000.0);

    c.bench_function("feature_extract_1000_events", |b| {
        b.iter(|| {
            let mut extractor = FeatureExtractor::new(&FeaturesConfig::default());
            for ev in events.iter().cloned() {
                extractor.add_event(ev);
            }
            black_box(extractor.compute_features(black_box(1010.0)))
        })
    });
}

fn bench_detection(c: &mut Criterion) {
    let mut detector = ActivityShiftDetector::new(DetectorConfig::default());
    detector.set_baseline(BaselineProfile {
        avg_typing_speed: 200.0,
        avg_idle_duration: 2.0,
        avg_focus_rate: 0.5,
    });
    let features = FeatureVector {
        avg_typing_speed: 400.0,
        avg_idle_duration: 5.0,
        focus_loss_count: 15,
        window_start: 0.0,
        window_end: 30.0,
        ..FeatureVector::default()
    };

    c.bench_function("detector_compute_scores", |b| {
        b.iter(|| black_box(detector.compute_scores(black_box(&features))))
    });
}

criterion_group!(benches, bench_feature_extraction, bench_detection);
criterion_main!(benches);
