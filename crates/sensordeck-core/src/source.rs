//! Telemetry source abstraction.
//!
//! A source owns its own periodic schedule and pushes readings through a
//! channel until stopped. Concrete implementations live in the
//! `sensordeck-sim` crate; the engine only sees this trait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::telemetry::{ColorReading, DistanceSample};

/// A reading emitted by a telemetry source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceReading {
    /// A distance measurement.
    Distance(DistanceSample),

    /// A color classification.
    Color(ColorReading),
}

/// A handle to stop a running telemetry source.
///
/// Handles are created armed; [`SourceHandle::stop`] disarms them
/// permanently. All clones share the same flag, so a source that is
/// stopped before its task is first polled never produces a reading.
#[derive(Debug, Clone)]
pub struct SourceHandle {
    active: Arc<AtomicBool>,
}

impl SourceHandle {
    /// Create an armed handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Signal the source to stop. Idempotent.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Whether the source should keep producing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for SourceHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A producer of synthetic telemetry readings.
///
/// Implementors drive their own periodic schedule and send readings
/// through the provided channel. The run loop must re-check its stop
/// handle after every tick so that nothing is emitted once the handle is
/// disarmed.
#[async_trait::async_trait]
pub trait TelemetrySource: Send + 'static {
    /// The name of this source (for logging).
    fn name(&self) -> &'static str;

    /// A handle that stops this source from another task.
    fn stop_handle(&self) -> SourceHandle;

    /// Run the production loop, sending readings through `tx`.
    ///
    /// Returns when the source is stopped or the receiver is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails while producing.
    async fn run(self: Box<Self>, tx: mpsc::Sender<SourceReading>) -> Result<()>;
}
