//! Simulated ultrasonic distance source.
//!
//! Produces a slow sinusoidal drift around a base distance with bounded
//! uniform noise, clamped to the sensor's usable range. This mimics an
//! HC-SR04 pointed at a target oscillating in front of the robot.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, trace};

use sensordeck_core::{DistanceSample, Result, SourceHandle, SourceReading, TelemetrySource};

/// Configuration for the distance source.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSourceConfig {
    /// Interval between readings.
    pub sample_interval: Duration,

    /// Center of the simulated signal, in centimeters.
    pub base_cm: f64,

    /// Amplitude of the sinusoidal drift, in centimeters.
    pub drift_cm: f64,

    /// Millisecond divisor of the sine phase; larger values drift slower.
    pub drift_scale_ms: f64,

    /// Half-width of the uniform noise band, in centimeters.
    pub noise_cm: f64,

    /// Lower clamp of emitted readings.
    pub min_cm: f64,

    /// Upper clamp of emitted readings.
    pub max_cm: f64,

    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for DistanceSourceConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(500),
            base_cm: 40.0,
            drift_cm: 15.0,
            drift_scale_ms: 5000.0,
            noise_cm: 2.0,
            min_cm: 5.0,
            max_cm: 100.0,
            seed: None,
        }
    }
}

/// Synthetic ultrasonic distance source.
///
/// Emits one [`DistanceSample`] per interval, starting one full interval
/// after the run loop begins.
#[derive(Debug)]
pub struct DistanceSource {
    config: DistanceSourceConfig,
    handle: SourceHandle,
}

impl DistanceSource {
    /// Create a source with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DistanceSourceConfig::default())
    }

    /// Create a source with custom configuration.
    #[must_use]
    pub fn with_config(config: DistanceSourceConfig) -> Self {
        Self {
            config,
            handle: SourceHandle::new(),
        }
    }

    /// Drift waveform before noise: `base + drift * sin(t / scale)`.
    #[must_use]
    pub fn base_distance_cm(config: &DistanceSourceConfig, elapsed_ms: f64) -> f64 {
        config.base_cm + config.drift_cm * (elapsed_ms / config.drift_scale_ms).sin()
    }

    /// One synthesized reading: waveform plus noise, clamped to range.
    fn next_distance(config: &DistanceSourceConfig, rng: &mut StdRng, elapsed_ms: f64) -> f64 {
        let base = Self::base_distance_cm(config, elapsed_ms);
        let noise = rng.random_range(-config.noise_cm..=config.noise_cm);
        (base + noise).clamp(config.min_cm, config.max_cm)
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for DistanceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TelemetrySource for DistanceSource {
    fn name(&self) -> &'static str {
        "distance"
    }

    fn stop_handle(&self) -> SourceHandle {
        self.handle.clone()
    }

    async fn run(self: Box<Self>, tx: mpsc::Sender<SourceReading>) -> Result<()> {
        if !self.handle.is_active() {
            debug!("distance source stopped before it started");
            return Ok(());
        }

        debug!(
            interval_ms = self.config.sample_interval.as_millis(),
            "starting distance source"
        );

        let mut rng = self.rng();
        let started = Instant::now();
        let mut ticker = interval_at(
            started + self.config.sample_interval,
            self.config.sample_interval,
        );

        loop {
            ticker.tick().await;
            if !self.handle.is_active() {
                break;
            }

            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            let distance_cm = Self::next_distance(&self.config, &mut rng, elapsed_ms);
            trace!(distance_cm, "distance reading");

            let sample = DistanceSample {
                timestamp: Utc::now(),
                distance_cm,
            };
            if tx.send(SourceReading::Distance(sample)).await.is_err() {
                debug!("reading channel closed, stopping distance source");
                break;
            }
        }

        self.handle.stop();
        debug!("distance source stopped");
        Ok(())
    }
}
