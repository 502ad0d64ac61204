//! Core telemetry types for sensordeck.
//!
//! This module defines the fundamental data structures for representing
//! readings from the synthetic sensors and the per-session statistics
//! derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single reading from the ultrasonic distance source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    /// When the reading was produced.
    pub timestamp: DateTime<Utc>,

    /// Measured distance in centimeters.
    pub distance_cm: f64,
}

impl DistanceSample {
    /// Create a new sample stamped with the current time.
    #[must_use]
    pub fn new(distance_cm: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            distance_cm,
        }
    }
}

/// A color category reported by the classification source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedColor {
    /// The red target marker.
    Red,
    /// The green target marker.
    Green,
    /// The blue target marker.
    Blue,
    /// The black line surface.
    Black,
}

impl DetectedColor {
    /// The full palette the classifier can report, in display order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Black];

    /// Lower-case name of the color.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Black => "black",
        }
    }
}

impl std::fmt::Display for DetectedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single classification from the color source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorReading {
    /// When the classification was produced.
    pub timestamp: DateTime<Utc>,

    /// The detected category.
    pub color: DetectedColor,
}

impl ColorReading {
    /// Create a new reading stamped with the current time.
    #[must_use]
    pub fn new(color: DetectedColor) -> Self {
        Self {
            timestamp: Utc::now(),
            color,
        }
    }
}

/// Cumulative per-color detection counts for a session.
///
/// Counts only move through [`ColorTally::record`], so the total always
/// equals the sum of the four categories. The tally is never reset while
/// a session is live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTally {
    red: u64,
    green: u64,
    blue: u64,
    black: u64,
    total: u64,
    current: Option<DetectedColor>,
}

impl ColorTally {
    /// Create an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one detection: bump that color's count and the total, and
    /// remember the color as the current one.
    pub fn record(&mut self, color: DetectedColor) {
        match color {
            DetectedColor::Red => self.red += 1,
            DetectedColor::Green => self.green += 1,
            DetectedColor::Blue => self.blue += 1,
            DetectedColor::Black => self.black += 1,
        }
        self.total += 1;
        self.current = Some(color);
    }

    /// The count recorded for one color.
    #[must_use]
    pub const fn count(&self, color: DetectedColor) -> u64 {
        match color {
            DetectedColor::Red => self.red,
            DetectedColor::Green => self.green,
            DetectedColor::Blue => self.blue,
            DetectedColor::Black => self.black,
        }
    }

    /// Total detections across all colors.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The most recently detected color, or `None` before the first
    /// detection.
    #[must_use]
    pub const fn current(&self) -> Option<DetectedColor> {
        self.current
    }

    /// Per-color counts in palette order, for chart rendering.
    #[must_use]
    pub const fn counts(&self) -> [(DetectedColor, u64); 4] {
        [
            (DetectedColor::Red, self.red),
            (DetectedColor::Green, self.green),
            (DetectedColor::Blue, self.blue),
            (DetectedColor::Black, self.black),
        ]
    }
}

/// Classification of an event-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Lifecycle and boot messages.
    Info,
    /// A distance reading.
    Data,
    /// A recoverable anomaly.
    Warn,
    /// A failure.
    Error,
    /// A color detection.
    Color,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Data => write!(f, "data"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
            Self::Color => write!(f, "color"),
        }
    }
}

/// A human-readable entry in the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Display message, already formatted.
    pub message: String,

    /// What produced the entry.
    pub kind: EventKind,
}

impl TelemetryEvent {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self::at(Utc::now(), kind, message)
    }

    /// Create an entry with an explicit timestamp.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            kind,
        }
    }
}
