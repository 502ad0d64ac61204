//! `sensordeck` - Terminal feed of synthetic robotics telemetry
//!
//! This binary streams the simulated sensor feed to the terminal and
//! exposes status and configuration commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;

use sensordeck::cli::{Cli, Command, ConfigCommand, RunCommand};
use sensordeck::{init_logging, Config};
use sensordeck_core::{DetectedColor, EngineUpdate, TelemetryEngine, TelemetrySource};
use sensordeck_sim::{ColorSource, DistanceSource};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Run(run_cmd) => run_feed(&config, &run_cmd).await,
        Command::Status(status_cmd) => print_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

/// Start the engine with both synthetic sources and stream the feed until
/// Ctrl-C or the optional deadline.
async fn run_feed(config: &Config, cmd: &RunCommand) -> Result<()> {
    let engine = TelemetryEngine::new(config.engine_config());
    let mut updates = engine.subscribe();

    let sources: Vec<Box<dyn TelemetrySource>> = vec![
        Box::new(DistanceSource::with_config(config.distance_config())),
        Box::new(ColorSource::with_config(config.color_config())),
    ];
    engine.start(sources)?;

    let deadline = async {
        match cmd.duration {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(EngineUpdate::Event(entry)) => {
                    let local = entry.timestamp.with_timezone(&Local);
                    println!("{} {}", local.format("%H:%M:%S"), entry.message);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "update stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
            () = &mut deadline => break,
            _ = &mut ctrl_c => break,
        }
    }

    engine.stop();
    print_summary(&engine, cmd.json)?;
    Ok(())
}

/// Print the end-of-session summary.
fn print_summary(engine: &TelemetryEngine, json: bool) -> Result<()> {
    let samples = engine.window().len();
    let latest = engine.latest_distance();
    let stability = engine.stability();
    let tally = engine.tally();

    if json {
        let summary = serde_json::json!({
            "samples": samples,
            "latest_distance_cm": latest.map(|s| s.distance_cm),
            "stability_pct": stability,
            "colors": {
                "red": tally.count(DetectedColor::Red),
                "green": tally.count(DetectedColor::Green),
                "blue": tally.count(DetectedColor::Blue),
                "black": tally.count(DetectedColor::Black),
                "total": tally.total(),
                "current": tally.current().map(DetectedColor::name),
            },
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let distance = latest.map_or_else(|| "--".to_string(), |s| format!("{:.1}cm", s.distance_cm));

        println!();
        println!("Session summary");
        println!("---------------");
        println!("Samples:    {samples}");
        println!("Distance:   {distance}");
        println!("Stability:  {stability:.1}%");
        println!(
            "Colors:     R:{} G:{} B:{} K:{} (total {})",
            tally.count(DetectedColor::Red),
            tally.count(DetectedColor::Green),
            tally.count(DetectedColor::Blue),
            tally.count(DetectedColor::Black),
            tally.total(),
        );
    }
    Ok(())
}

/// Print the resolved runtime parameters without starting the engine.
fn print_status(config: &Config, json: bool) -> Result<()> {
    if json {
        let status = serde_json::json!({
            "distance_interval_ms": config.distance.interval_ms,
            "color_interval_ms": config.color.interval_ms,
            "window_size": config.engine.window_size,
            "event_capacity": config.engine.event_capacity,
            "config_path": Config::default_config_path(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("sensordeck status");
        println!("-----------------");
        println!("Distance interval:  {}ms", config.distance.interval_ms);
        println!("Color interval:     {}ms", config.color.interval_ms);
        println!("Window size:        {}", config.engine.window_size);
        println!("Event capacity:     {}", config.engine.event_capacity);
        println!(
            "Config file:        {}",
            Config::default_config_path().display()
        );
    }
    Ok(())
}

/// Handle the `config` command family.
fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Engine]");
                println!("  Window size:       {}", config.engine.window_size);
                println!("  Event capacity:    {}", config.engine.event_capacity);
                println!("  Channel capacity:  {}", config.engine.channel_capacity);
                println!();
                println!("[Distance]");
                println!("  Interval:          {}ms", config.distance.interval_ms);
                println!("  Base:              {}cm", config.distance.base_cm);
                println!("  Drift:             {}cm", config.distance.drift_cm);
                println!("  Noise:             {}cm", config.distance.noise_cm);
                println!(
                    "  Range:             {}cm - {}cm",
                    config.distance.min_cm, config.distance.max_cm
                );
                println!();
                println!("[Color]");
                println!("  Interval:          {}ms", config.color.interval_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
