//! JSON scenario configuration for headless runs
//!
//! A scenario describes the initial arena (one Hive, any number of target
//! dummies) and a time-ordered script of player commands to replay against it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::actor::SLOT_COUNT;

/// Headless scenario loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Where the Hive spawns
    #[serde(default)]
    pub hive_spawn: [f32; 2],
    /// Stationary target dummies to spawn
    #[serde(default)]
    pub dummies: Vec<DummySpawn>,
    /// Scripted commands, ordered by timestamp
    pub script: Vec<ScriptedCommand>,
    /// Scenario length in seconds; the run ends here regardless of the script
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

/// A target dummy: an actor with health and no abilities of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DummySpawn {
    pub position: [f32; 2],
    #[serde(default = "default_dummy_health")]
    pub max_health: f32,
}

/// One scripted command, fired when the scenario clock reaches `at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedCommand {
    /// Timestamp in seconds from scenario start
    pub at: f32,
    #[serde(flatten)]
    pub command: CommandKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CommandKind {
    /// Move the aim point
    Aim { x: f32, y: f32 },
    /// Issue a click-to-move order
    MoveTo { x: f32, y: f32 },
    /// Press an ability key (slot 0-3)
    Ability { slot: usize },
}

fn default_max_duration() -> f32 {
    60.0
}

fn default_dummy_health() -> f32 {
    100.0
}

impl ScenarioConfig {
    /// Load a scenario from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;

        let config: ScenarioConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the scenario
    pub fn validate(&self) -> Result<(), String> {
        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        for dummy in &self.dummies {
            if dummy.max_health <= 0.0 {
                return Err(format!(
                    "dummy max_health must be positive, got {}",
                    dummy.max_health
                ));
            }
        }

        let mut previous = 0.0_f32;
        for (i, command) in self.script.iter().enumerate() {
            if command.at < 0.0 {
                return Err(format!("script[{}]: timestamp must not be negative", i));
            }
            if command.at < previous {
                return Err(format!(
                    "script[{}]: timestamps must be non-decreasing ({} after {})",
                    i, command.at, previous
                ));
            }
            previous = command.at;

            if let CommandKind::Ability { slot } = command.command {
                if slot >= SLOT_COUNT {
                    return Err(format!(
                        "script[{}]: ability slot {} is out of range (0-{})",
                        i,
                        slot,
                        SLOT_COUNT - 1
                    ));
                }
            }
        }

        Ok(())
    }

    /// Built-in demo scenario exercising every Hive ability: rift, dash,
    /// detonation against a target dummy, and an ultimate channel cancelled
    /// partway through by another rift cast.
    pub fn demo() -> Self {
        Self {
            hive_spawn: [0.0, 0.0],
            dummies: vec![DummySpawn {
                position: [2.5, 0.0],
                max_health: 100.0,
            }],
            script: vec![
                ScriptedCommand {
                    at: 0.0,
                    command: CommandKind::Aim { x: 2.5, y: 0.0 },
                },
                ScriptedCommand {
                    at: 0.1,
                    command: CommandKind::Ability { slot: 0 },
                },
                ScriptedCommand {
                    at: 0.5,
                    command: CommandKind::Ability { slot: 1 },
                },
                ScriptedCommand {
                    at: 3.5,
                    command: CommandKind::Ability { slot: 0 },
                },
                ScriptedCommand {
                    at: 4.0,
                    command: CommandKind::Ability { slot: 2 },
                },
                ScriptedCommand {
                    at: 5.0,
                    command: CommandKind::Ability { slot: 3 },
                },
                ScriptedCommand {
                    at: 8.0,
                    command: CommandKind::Ability { slot: 0 },
                },
            ],
            max_duration_secs: 12.0,
            random_seed: Some(7),
            output_path: None,
        }
    }
}
