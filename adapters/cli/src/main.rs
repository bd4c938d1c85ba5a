#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Corridor Defence headlessly.

mod autoplay;
mod config;
mod report;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;

use corridor_defence_simulation::Simulation;

use crate::{
    autoplay::Autoplayer,
    report::{RunReport, Summary},
};

/// Runs a Corridor Defence simulation without a window and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "corridor-defence", version, about)]
struct Cli {
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for both the corridor layout and the wave rolls.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 20_000)]
    ticks: u32,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Start the run at fast speed.
    #[arg(long)]
    fast: bool,
    /// Leave the run to play out without building anything.
    #[arg(long)]
    no_autoplay: bool,
    /// Raise the default log level to debug.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Corridor Defence command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    ensure!(cli.frame_ms > 0, "--frame-ms must be positive");

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config::reseed(&mut config, seed);
    }

    let mut simulation = Simulation::with_hooks(config, RunReport::default())
        .context("invalid tuning")?;
    if cli.fast {
        let speed = simulation.toggle_speed();
        info!("running at {speed}x speed");
    }

    let mut autoplayer = (!cli.no_autoplay).then(Autoplayer::default);
    let frame = Duration::from_millis(cli.frame_ms);
    let mut frames = 0;
    while frames < cli.ticks && !simulation.is_game_over() {
        if let Some(player) = autoplayer.as_mut() {
            let _ = player.act(&mut simulation);
        }
        simulation.update(frame);
        frames += 1;
    }

    if let Some(player) = &autoplayer {
        info!("autoplayer took {} actions", player.moves());
    }

    let snapshot = simulation.snapshot();
    println!(
        "{}",
        Summary {
            report: simulation.hooks(),
            snapshot: &snapshot,
            frames,
        }
    );
    Ok(())
}
