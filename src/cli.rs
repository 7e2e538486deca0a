//! Command-line interface for RiftSim
//!
//! All runs are headless; without a scenario file the built-in demo runs.

use clap::Parser;
use std::path::PathBuf;

/// Hive ability sandbox simulator
#[derive(Parser, Debug)]
#[command(name = "riftsim")]
#[command(about = "Hive ability sandbox simulator")]
#[command(version)]
pub struct Args {
    /// JSON scenario file to run (defaults to the built-in demo)
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub scenario: Option<PathBuf>,

    /// Output path for the combat log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Override the scenario's maximum duration in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Override the scenario's random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
