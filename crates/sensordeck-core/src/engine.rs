//! Engine supervising the telemetry sources and their session stores.
//!
//! The engine owns the rolling distance window, the color tally, and the
//! event log. One router task is the sole writer to all three: it consumes
//! readings from the sources, updates the stores, appends formatted log
//! entries, and fans typed updates out to subscribers. Queries read the
//! stores under their locks, so the single-writer rule holds even on a
//! multi-threaded runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::events::EventLog;
use crate::source::{SourceHandle, SourceReading, TelemetrySource};
use crate::stability::stability_score;
use crate::telemetry::{ColorTally, DistanceSample, EventKind, TelemetryEvent};
use crate::window::RollingWindow;

/// Sizing parameters for the engine's stores and channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of distance samples retained for charting.
    pub window_capacity: usize,

    /// Maximum number of event-log entries retained.
    pub event_capacity: usize,

    /// Buffer size of the reading and update channels.
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_capacity: 50,
            event_capacity: 100,
            channel_capacity: 100,
        }
    }
}

/// A typed update pushed to engine subscribers.
#[derive(Debug, Clone)]
pub enum EngineUpdate {
    /// A new distance sample entered the window.
    Distance(DistanceSample),

    /// The color tally changed; carries the post-update snapshot.
    Tally(ColorTally),

    /// An entry was appended to the event log.
    Event(TelemetryEvent),
}

/// Supervisor for the telemetry sources and their session stores.
///
/// All state is session-scoped: it is created with the engine and
/// discarded with it; nothing persists.
#[derive(Debug)]
pub struct TelemetryEngine {
    config: EngineConfig,
    window: Arc<Mutex<RollingWindow>>,
    tally: Arc<Mutex<ColorTally>>,
    events: Arc<Mutex<EventLog>>,
    updates: broadcast::Sender<EngineUpdate>,
    running: Arc<AtomicBool>,
    source_handles: Mutex<Vec<SourceHandle>>,
}

/// Lock a store, recovering the guard if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TelemetryEngine {
    /// Create an engine with the given sizing.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let (updates, _) = broadcast::channel(config.channel_capacity);
        Self {
            window: Arc::new(Mutex::new(RollingWindow::new(config.window_capacity))),
            tally: Arc::new(Mutex::new(ColorTally::new())),
            events: Arc::new(Mutex::new(EventLog::new(config.event_capacity))),
            updates,
            running: Arc::new(AtomicBool::new(false)),
            source_handles: Mutex::new(Vec::new()),
            config,
        }
    }

    /// Subscribe to the typed update stream.
    ///
    /// Subscribers that fall behind by more than the channel capacity see
    /// a lag error and skip ahead; the stores remain authoritative.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineUpdate> {
        self.updates.subscribe()
    }

    /// Whether the engine has been started and not yet stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the sources and begin routing their readings.
    ///
    /// Seeds the event log with the boot sequence, spawns one task per
    /// source, and spawns the router task. Must be called from within a
    /// Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSources`] if `sources` is empty, or
    /// [`Error::AlreadyRunning`] if the engine is already running.
    pub fn start(&self, sources: Vec<Box<dyn TelemetrySource>>) -> Result<()> {
        if sources.is_empty() {
            return Err(Error::NoSources);
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        debug!(sources = sources.len(), "starting telemetry engine");

        // Boot entries are stamped relative to this activation.
        for entry in lock(&self.events).seed(Utc::now()) {
            let _ = self.updates.send(EngineUpdate::Event(entry));
        }

        let (tx, rx) = mpsc::channel(self.config.channel_capacity);

        {
            let mut handles = lock(&self.source_handles);
            handles.clear();
            for source in sources {
                handles.push(source.stop_handle());
                let tx = tx.clone();
                let name = source.name();
                tokio::spawn(async move {
                    if let Err(e) = source.run(tx).await {
                        warn!(source = name, error = %e, "telemetry source exited with error");
                    }
                });
            }
        }
        drop(tx);

        tokio::spawn(Self::route(
            rx,
            Arc::clone(&self.window),
            Arc::clone(&self.tally),
            Arc::clone(&self.events),
            self.updates.clone(),
        ));

        Ok(())
    }

    /// Stop all sources. Idempotent: repeated calls are no-ops.
    ///
    /// Sources observe the stop signal after their next tick, so no
    /// reading produced after this call reaches the stores or the update
    /// stream.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            trace!("engine already stopped");
            return;
        }

        debug!("stopping telemetry engine");
        for handle in lock(&self.source_handles).iter() {
            handle.stop();
        }
    }

    /// Stability score derived from the current window, in `[0, 100]`.
    ///
    /// Computed fresh on every call; safe to invoke on every render.
    #[must_use]
    pub fn stability(&self) -> f64 {
        stability_score(&lock(&self.window).distances())
    }

    /// The most recent distance sample, if any.
    #[must_use]
    pub fn latest_distance(&self) -> Option<DistanceSample> {
        lock(&self.window).latest().copied()
    }

    /// Snapshot of the color tally.
    #[must_use]
    pub fn tally(&self) -> ColorTally {
        lock(&self.tally).clone()
    }

    /// Ordered snapshot of the distance window, oldest first.
    #[must_use]
    pub fn window(&self) -> Vec<DistanceSample> {
        lock(&self.window).snapshot()
    }

    /// Ordered snapshot of the event log, most recent last.
    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        lock(&self.events).snapshot()
    }

    /// Route source readings into the stores and the update stream.
    ///
    /// Runs until every source has dropped its sender.
    async fn route(
        mut rx: mpsc::Receiver<SourceReading>,
        window: Arc<Mutex<RollingWindow>>,
        tally: Arc<Mutex<ColorTally>>,
        events: Arc<Mutex<EventLog>>,
        updates: broadcast::Sender<EngineUpdate>,
    ) {
        while let Some(reading) = rx.recv().await {
            match reading {
                SourceReading::Distance(sample) => {
                    lock(&window).push(sample);
                    trace!(distance_cm = sample.distance_cm, "distance sample routed");

                    let entry = TelemetryEvent::at(
                        sample.timestamp,
                        EventKind::Data,
                        format!("[SENSOR] Distance: {:.1}cm", sample.distance_cm),
                    );
                    lock(&events).append(entry.clone());

                    let _ = updates.send(EngineUpdate::Distance(sample));
                    let _ = updates.send(EngineUpdate::Event(entry));
                }
                SourceReading::Color(reading) => {
                    let snapshot = {
                        let mut tally = lock(&tally);
                        tally.record(reading.color);
                        tally.clone()
                    };
                    trace!(color = %reading.color, "color reading routed");

                    let entry = TelemetryEvent::at(
                        reading.timestamp,
                        EventKind::Color,
                        format!("[COLOR] Detected: {}", reading.color.name().to_uppercase()),
                    );
                    lock(&events).append(entry.clone());

                    let _ = updates.send(EngineUpdate::Tally(snapshot));
                    let _ = updates.send(EngineUpdate::Event(entry));
                }
            }
        }
        debug!("telemetry router stopped");
    }
}

impl Default for TelemetryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
