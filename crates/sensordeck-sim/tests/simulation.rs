//! Virtual-time integration tests for the synthetic sources driving the
//! engine end to end.
//!
//! `start_paused` runs the Tokio clock in virtual time: `sleep` advances
//! the clock instantly once every task is idle, so interval-driven sources
//! fire deterministically.

use std::time::Duration;

use sensordeck_core::{DetectedColor, EngineConfig, EventKind, TelemetryEngine, TelemetrySource};
use sensordeck_sim::{ColorSource, ColorSourceConfig, DistanceSource, DistanceSourceConfig};

fn distance_source(interval_ms: u64) -> Box<dyn TelemetrySource> {
    Box::new(DistanceSource::with_config(DistanceSourceConfig {
        sample_interval: Duration::from_millis(interval_ms),
        seed: Some(7),
        ..DistanceSourceConfig::default()
    }))
}

fn color_source(interval_ms: u64) -> Box<dyn TelemetrySource> {
    Box::new(ColorSource::with_config(ColorSourceConfig {
        sample_interval: Duration::from_millis(interval_ms),
        seed: Some(11),
    }))
}

/// Park the test task briefly so the sources and router drain.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn distance_feed_fills_window_in_order() {
    let engine = TelemetryEngine::new(EngineConfig::default());
    engine.start(vec![distance_source(500)]).unwrap();

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    settle().await;

    let window = engine.window();
    assert_eq!(window.len(), 3);
    assert!(window.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    for sample in &window {
        assert!((5.0..=100.0).contains(&sample.distance_cm));
    }

    let events = engine.events();
    assert_eq!(events.len(), 6);
    assert!(events[..3].iter().all(|e| e.kind == EventKind::Info));
    assert!(events[3..].iter().all(|e| e.kind == EventKind::Data));
    assert!(events[3..]
        .iter()
        .all(|e| e.message.starts_with("[SENSOR] Distance:")));

    engine.stop();
}

#[tokio::test(start_paused = true)]
async fn color_feed_accumulates_tally() {
    let engine = TelemetryEngine::new(EngineConfig::default());
    engine.start(vec![color_source(1500)]).unwrap();

    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(1500)).await;
    }
    settle().await;

    let tally = engine.tally();
    assert_eq!(tally.total(), 4);
    let sum: u64 = DetectedColor::ALL.iter().map(|&c| tally.count(c)).sum();
    assert_eq!(sum, 4);
    assert!(tally.current().is_some());

    let events = engine.events();
    assert_eq!(events.len(), 7);
    assert!(events[3..].iter().all(|e| e.kind == EventKind::Color));
    assert!(events[3..]
        .iter()
        .all(|e| e.message.starts_with("[COLOR] Detected:")));

    engine.stop();
}

#[tokio::test(start_paused = true)]
async fn window_caps_at_capacity_under_sustained_feed() {
    let engine = TelemetryEngine::new(EngineConfig::default());
    engine.start(vec![distance_source(10)]).unwrap();

    // 103 ticks: enough to overflow both the 50-sample window and the
    // 100-entry event log.
    tokio::time::sleep(Duration::from_millis(1030)).await;
    settle().await;

    let window = engine.window();
    assert_eq!(window.len(), 50);
    assert!(window.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let stability = engine.stability();
    assert!((0.0..=100.0).contains(&stability));

    // The event log capped at 100; the three boot entries were the first
    // to be evicted.
    let events = engine.events();
    assert_eq!(events.len(), 100);
    assert!(events.iter().all(|e| e.kind == EventKind::Data));

    engine.stop();
}

#[tokio::test(start_paused = true)]
async fn both_sources_run_independently() {
    let engine = TelemetryEngine::new(EngineConfig::default());
    engine
        .start(vec![distance_source(500), color_source(1500)])
        .unwrap();

    // 3000ms: 6 distance ticks, 2 color ticks.
    for _ in 0..6 {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    settle().await;

    assert_eq!(engine.window().len(), 6);
    assert_eq!(engine.tally().total(), 2);
    assert_eq!(engine.events().len(), 3 + 6 + 2);

    engine.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_silences_sources() {
    let engine = TelemetryEngine::new(EngineConfig::default());
    engine.start(vec![distance_source(500)]).unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    settle().await;
    assert_eq!(engine.window().len(), 1);

    engine.stop();
    engine.stop();
    assert!(!engine.is_running());

    // Plenty of would-be ticks; none may produce a reading.
    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;

    assert_eq!(engine.window().len(), 1);
    assert_eq!(engine.events().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn restart_does_not_double_schedule() {
    let engine = TelemetryEngine::new(EngineConfig::default());
    engine.start(vec![distance_source(500)]).unwrap();
    engine.stop();

    engine.start(vec![distance_source(500)]).unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    settle().await;

    // Only the second source is live: one sample, two boot sequences.
    assert_eq!(engine.window().len(), 1);
    assert_eq!(engine.events().len(), 3 + 3 + 1);

    engine.stop();
}

#[tokio::test(start_paused = true)]
async fn stopping_before_first_tick_emits_nothing() {
    let engine = TelemetryEngine::new(EngineConfig::default());
    engine.start(vec![distance_source(500)]).unwrap();
    engine.stop();

    tokio::time::sleep(Duration::from_secs(2)).await;
    settle().await;

    assert!(engine.window().is_empty());
    assert_eq!(engine.events().len(), 3);
}
