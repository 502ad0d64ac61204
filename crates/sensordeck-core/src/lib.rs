//! `sensordeck-core` - Telemetry simulation and aggregation engine
//!
//! This library provides the session-scoped core of a robotics sensor
//! dashboard: typed readings from synthetic sources, bounded in-memory
//! stores (a rolling distance window, a cumulative color tally, and a
//! capped event log), a stability estimator derived from the window, and
//! an engine that supervises the sources and routes their readings.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod events;
pub mod source;
pub mod stability;
pub mod telemetry;
pub mod window;

pub use engine::{EngineConfig, EngineUpdate, TelemetryEngine};
pub use error::{Error, Result};
pub use events::EventLog;
pub use source::{SourceHandle, SourceReading, TelemetrySource};
pub use stability::stability_score;
pub use telemetry::{
    ColorReading, ColorTally, DetectedColor, DistanceSample, EventKind, TelemetryEvent,
};
pub use window::RollingWindow;
