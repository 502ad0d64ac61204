//! Simulated color classification source.
//!
//! Reports one of the four target colors chosen uniformly at random on a
//! fixed cadence, mimicking a TCS34725 scanning markers as the robot
//! drives past them.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, trace};

use sensordeck_core::{
    ColorReading, DetectedColor, Result, SourceHandle, SourceReading, TelemetrySource,
};

/// Configuration for the color source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSourceConfig {
    /// Interval between classifications.
    pub sample_interval: Duration,

    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ColorSourceConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(1500),
            seed: None,
        }
    }
}

/// Synthetic color classification source.
///
/// Emits one [`ColorReading`] per interval, starting one full interval
/// after the run loop begins.
#[derive(Debug)]
pub struct ColorSource {
    config: ColorSourceConfig,
    handle: SourceHandle,
}

impl ColorSource {
    /// Create a source with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ColorSourceConfig::default())
    }

    /// Create a source with custom configuration.
    #[must_use]
    pub fn with_config(config: ColorSourceConfig) -> Self {
        Self {
            config,
            handle: SourceHandle::new(),
        }
    }

    /// Uniform pick from the palette.
    fn next_color(rng: &mut StdRng) -> DetectedColor {
        DetectedColor::ALL[rng.random_range(0..DetectedColor::ALL.len())]
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for ColorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TelemetrySource for ColorSource {
    fn name(&self) -> &'static str {
        "color"
    }

    fn stop_handle(&self) -> SourceHandle {
        self.handle.clone()
    }

    async fn run(self: Box<Self>, tx: mpsc::Sender<SourceReading>) -> Result<()> {
        if !self.handle.is_active() {
            debug!("color source stopped before it started");
            return Ok(());
        }

        debug!(
            interval_ms = self.config.sample_interval.as_millis(),
            "starting color source"
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

            let color = Self::next_color(&mut rng);
            trace!(color = %color, "color reading");

            let reading = ColorReading {
                timestamp: Utc::now(),
                color,
            };
            if tx.send(SourceReading::Color(reading)).await.is_err() {
                debug!("reading channel closed, stopping color source");
                break;
            }
        }

        self.handle.stop();
        debug!("color source stopped");
        Ok(())
    }
}
