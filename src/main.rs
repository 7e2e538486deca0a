//! RiftSim - Hive Ability Sandbox
//!
//! Runs a scripted scenario headlessly and prints a summary.

use riftsim::cli;
use riftsim::headless::{run_scenario, ScenarioConfig};

fn main() {
    let args = cli::parse_args();

    let mut config = match &args.scenario {
        Some(path) => match ScenarioConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            println!("No scenario file given, running the built-in demo");
            ScenarioConfig::demo()
        }
    };

    if let Some(output) = &args.output {
        config.output_path = Some(output.display().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }

    match run_scenario(config) {
        Ok(result) => {
            println!();
            println!("=== Scenario result ===");
            println!("Elapsed: {:.2}s", result.elapsed);
            if let Some(seed) = result.random_seed {
                println!("Seed: {}", seed);
            }
            println!(
                "{}: {:.1}/{:.1} health at ({:.2}, {:.2})",
                result.hive.name,
                result.hive.final_health,
                result.hive.max_health,
                result.hive.final_position.0,
                result.hive.final_position.1
            );
            println!(
                "Rifts: {} spawned, {} alive at end",
                result.rifts_spawned, result.rifts_alive
            );
            for dummy in &result.dummies {
                println!(
                    "{}: {:.1}/{:.1} health, {}",
                    dummy.name,
                    dummy.final_health,
                    dummy.max_health,
                    if dummy.survived { "survived" } else { "died" }
                );
            }
        }
        Err(e) => {
            eprintln!("Scenario failed: {}", e);
            std::process::exit(1);
        }
    }
}
