//! `sensordeck-sim` - Synthetic sensor sources
//!
//! Implementations of [`sensordeck_core::TelemetrySource`] that generate
//! plausible readings without hardware: a drifting sinusoidal distance
//! signal with bounded noise, and a uniform color classifier.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod color;
pub mod distance;

pub use color::{ColorSource, ColorSourceConfig};
pub use distance::{DistanceSource, DistanceSourceConfig};
