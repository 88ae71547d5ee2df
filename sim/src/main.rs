//! Headless locomotion simulation.
//!
//! Runs one character through a scripted course against a `rapier3d` world
//! and logs every state change and maneuver.

mod clock;
mod constants;
mod course;
mod script;
mod simulation;

use std::{error::Error, path::PathBuf};

use clap::Parser;
use locomotion::LocomotionConfig;

use crate::{
    constants::{DEFAULT_FRAME_HZ, DEFAULT_PHYSICS_HZ, DEFAULT_RUN_SECONDS},
    script::DEFAULT_SCRIPT,
    simulation::RunSettings,
};

/// Drive a physics-based character controller through a scripted course.
#[derive(Parser, Debug)]
#[command(name = "sim")]
struct Args {
    /// Locomotion tuning (TOML). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run before the character dies.
    #[arg(long, default_value_t = DEFAULT_RUN_SECONDS)]
    seconds: f32,

    /// Fixed physics tick rate (Hz).
    #[arg(long, default_value_t = DEFAULT_PHYSICS_HZ)]
    physics_hz: u32,

    /// Nominal frame tick rate (Hz).
    #[arg(long, default_value_t = DEFAULT_FRAME_HZ)]
    frame_hz: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.physics_hz == 0 || args.frame_hz == 0 {
        return Err("tick rates must be positive".into());
    }

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            LocomotionConfig::load(path)?
        }
        None => LocomotionConfig::default(),
    };

    let settings = RunSettings {
        seconds: args.seconds,
        physics_hz: args.physics_hz,
        frame_hz: args.frame_hz,
    };
    let summary = simulation::run(config, DEFAULT_SCRIPT, &settings);

    log::info!(
        "Simulated {:.2}s: {} frames, {} physics steps",
        summary.simulated_seconds,
        summary.frames,
        summary.physics_steps
    );
    for (state, steps) in &summary.steps_in_state {
        log::info!("  {state:<10} {steps:>5} steps");
    }
    log::info!(
        "Jumps {}, maneuvers {} started / {} finished / {} cancelled",
        summary.jumps,
        summary.maneuvers_started,
        summary.maneuvers_finished,
        summary.maneuvers_cancelled
    );
    log::info!(
        "Final state {} at ({:.2}, {:.2}, {:.2}), peak height {:.2}",
        summary.final_state,
        summary.final_position.x,
        summary.final_position.y,
        summary.final_position.z,
        summary.max_height
    );

    Ok(())
}
