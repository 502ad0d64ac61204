//! `sensordeck` - Terminal feed of synthetic robotics telemetry
//!
//! This crate wires the telemetry engine and the synthetic sources into a
//! command-line tool: configuration loading, logging setup, and the
//! `sensordeck` command surface.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
