//! Headless mode for agentic testing
//!
//! Runs scripted Hive scenarios without any graphical output, suitable for
//! automated testing and balance analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Run the built-in demo scenario
//! cargo run --release
//!
//! # Run a scripted scenario
//! cargo run --release -- --scenario my_scenario.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "hive_spawn": [0.0, 0.0],
//!   "dummies": [{ "position": [2.5, 0.0], "max_health": 100.0 }],
//!   "script": [
//!     { "at": 0.0, "action": "aim", "x": 2.5, "y": 0.0 },
//!     { "at": 0.1, "action": "ability", "slot": 0 }
//!   ],
//!   "max_duration_secs": 12.0,
//!   "random_seed": 7
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{CommandKind, ScenarioConfig, ScriptedCommand};
pub use runner::{run_scenario, ActorReport, ScenarioResult};
