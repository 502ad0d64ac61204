//! Append-only activity log with bounded retention.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::telemetry::{EventKind, TelemetryEvent};

/// Fixed boot-sequence messages and their offsets, in milliseconds before
/// activation.
const BOOT_SEQUENCE: [(&str, i64); 3] = [
    ("[BOOT] System initialized", 1000),
    ("[SENSOR] HC-SR04 ready", 900),
    ("[SENSOR] TCS34725 color sensor ready", 800),
];

/// Append-only log of telemetry activity, capped to the most recent
/// entries.
///
/// Once the log is at capacity, each append drops the oldest entry; the
/// relative order of retained entries never changes.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<TelemetryEvent>,
    capacity: usize,
}

impl EventLog {
    /// Create an empty log retaining at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Install the boot-sequence entries, stamped relative to
    /// `activated_at`, and return them for fan-out to subscribers.
    pub fn seed(&mut self, activated_at: DateTime<Utc>) -> Vec<TelemetryEvent> {
        BOOT_SEQUENCE
            .iter()
            .map(|&(message, offset_ms)| {
                let entry = TelemetryEvent::at(
                    activated_at - Duration::milliseconds(offset_ms),
                    EventKind::Info,
                    message,
                );
                self.append(entry.clone());
                entry
            })
            .collect()
    }

    /// Append an entry, dropping the oldest once over capacity.
    pub fn append(&mut self, entry: TelemetryEvent) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Ordered copy of the log, most recent last.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TelemetryEvent> {
        self.entries.iter().cloned().collect()
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries the log retains.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
