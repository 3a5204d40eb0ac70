//! # FRC Control Unit
//!
//! Runs one simulated match against the physics in `frc_hal`:
//! Disabled, then Autonomous for the auto period, then Teleop driven by a
//! scripted operator, then Disabled again. A JSON summary of the final robot
//! state is printed to stdout.
//!
//! The tick loop is paced at the configured rate unless `--unpaced` is given.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::Ordering;

use clap::Parser;
use frc_common::config::{ConfigError, ConfigLoader, Validate};
use frc_common::consts::DEFAULT_CONFIG_PATH;
use frc_common::control_unit::config::{AutoRoutine, ControlsConfig, RobotConfig};
use frc_common::control_unit::state::RobotMode;
use frc_common::hal::driver::Telemetry;
use frc_control_unit::cycle::{CycleRunner, Pacing};
use frc_control_unit::lifecycle::RobotRuntime;
use frc_control_unit::robot::RobotHardware;
use frc_hal::drivers::simulation::{SimOperatorInput, SimWorld};
use frc_hal::telemetry::{JsonTelemetry, MemoryTelemetry, Tee, TracingTelemetry};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Ticks spent disabled before autonomous starts.
const PRE_MATCH_TICKS: u64 = 10;

/// FRC Control Unit: simulated match runner
#[derive(Parser, Debug)]
#[command(name = "frc_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Command scheduler and lift controller running a simulated FRC match")]
struct Args {
    /// Path to the robot configuration TOML. Defaults apply when missing.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Autonomous routine, overriding `[auto] routine`.
    #[arg(long, value_name = "ROUTINE")]
    auto: Option<AutoRoutine>,

    /// Ticks spent in autonomous (15 s at 50 Hz).
    #[arg(long, default_value_t = 750)]
    auto_ticks: u64,

    /// Ticks spent in teleop.
    #[arg(long, default_value_t = 500)]
    teleop_ticks: u64,

    /// Run ticks back to back instead of at the tick rate.
    #[arg(long)]
    unpaced: bool,

    /// Write telemetry as JSON lines to this file.
    #[arg(long, value_name = "FILE")]
    telemetry: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

/// End-of-match report.
#[derive(Debug, Serialize)]
struct MatchSummary {
    routine: AutoRoutine,
    ticks: u64,
    elapsed_s: f64,
    drive_distance_inches: f64,
    heading_degrees: f64,
    lift_height_inches: Option<f64>,
    auto_state: Option<String>,
    telemetry_entries: u64,
    overruns: u64,
    avg_tick_us: f64,
    max_tick_us: f64,
}

fn main() {
    let args = Args::parse();
    let loaded = load_config(&args.config);

    let directive = match (&loaded, args.verbose) {
        (_, true) => "debug",
        (Ok((config, _)), false) => config.shared.log_level.as_directive(),
        (Err(_), false) => "info",
    };
    setup_tracing(directive, args.json);

    info!("FRC Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|(config, defaulted)| {
            if defaulted {
                warn!(
                    "No configuration at '{}', using defaults",
                    args.config.display()
                );
            }
            run(&args, config)
        });
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("FRC Control Unit shutdown complete");
}

/// Load and validate the config. A missing file yields the defaults and
/// `true` in the second slot.
fn load_config(path: &Path) -> Result<(RobotConfig, bool), ConfigError> {
    match RobotConfig::load_validated(path) {
        Ok(config) => Ok((config, false)),
        Err(ConfigError::FileNotFound) => {
            let config = RobotConfig::default();
            config.validate()?;
            Ok((config, true))
        }
        Err(e) => Err(e),
    }
}

fn run(args: &Args, mut config: RobotConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(routine) = args.auto {
        config.auto.routine = routine;
    }
    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }
    info!(
        "Config OK: service={}, tick_rate={} Hz, routine={}",
        config.shared.service_name, config.tick_rate_hz, config.auto.routine
    );

    let mut world = SimWorld::new(&config);
    let sink: Box<dyn Telemetry> = match &args.telemetry {
        Some(path) => {
            info!("Writing telemetry to {}", path.display());
            Box::new(JsonTelemetry::new(BufWriter::new(File::create(path)?)))
        }
        None => Box::new(TracingTelemetry),
    };
    let summary = MemoryTelemetry::new();
    let telemetry = Tee {
        first: sink,
        second: summary.clone(),
    };

    let hardware = RobotHardware::simulated(&world, Box::new(telemetry));
    let mut runtime = RobotRuntime::new(&config, hardware)?;

    let pacing = if args.unpaced {
        Pacing::Unpaced
    } else {
        Pacing::from_hz(config.tick_rate_hz)
    };
    let mut runner = CycleRunner::new(pacing);

    let running = runner.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let dt = config.tick_period_s();
    let phases = [
        (RobotMode::Disabled, PRE_MATCH_TICKS),
        (RobotMode::Autonomous, args.auto_ticks),
        (RobotMode::Teleop, args.teleop_ticks),
    ];
    for (mode, ticks) in phases {
        if !runner.is_running() {
            break;
        }
        if runtime.mode() != mode {
            runtime.set_mode(mode);
        }
        let controls = &config.controls;
        let executed = runner.run(ticks, |tick| {
            if mode == RobotMode::Teleop {
                scripted_operator(&world.input, controls, tick);
            }
            runtime.periodic();
            world.step(dt);
        });
        info!(%mode, executed, "phase complete");
    }

    world.input.release_all();
    if runtime.mode() != RobotMode::Disabled {
        runtime.set_mode(RobotMode::Disabled);
    }
    runtime.periodic();

    let stats = runner.stats();
    let report = MatchSummary {
        routine: config.auto.routine,
        ticks: runtime.ticks(),
        elapsed_s: world.elapsed_s(),
        drive_distance_inches: world.drive_distance_inches(),
        heading_degrees: runtime.robot.drivetrain.heading_degrees(),
        lift_height_inches: summary.number("liftPos"),
        auto_state: runtime
            .auto_command()
            .and_then(|id| runtime.scheduler.state(id))
            .map(|state| format!("{state:?}")),
        telemetry_entries: summary.count(),
        overruns: stats.overruns,
        avg_tick_us: stats.avg_cycle_ns() as f64 / 1_000.0,
        max_tick_us: stats.max_cycle_ns as f64 / 1_000.0,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Operator script for teleop: drive out, arc, raise the lift to the switch,
/// eject, then lower the lift by hand.
fn scripted_operator(input: &SimOperatorInput, controls: &ControlsConfig, tick: u64) {
    input.release_all();
    match tick {
        // Stick forward reads negative.
        0..100 => input.set_axis(controls.forward_axis, -0.6),
        100..150 => {
            input.set_axis(controls.forward_axis, -0.4);
            input.set_axis(controls.turn_axis, 0.5);
        }
        150..155 => input.set_button(controls.lift_switch_button, true),
        250..255 => input.set_button(controls.eject_button, true),
        300..350 => input.set_axis(controls.lift_axis, 0.5),
        _ => {}
    }
}

/// Setup tracing subscriber. `RUST_LOG` wins over the default directive.
fn setup_tracing(default_directive: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
