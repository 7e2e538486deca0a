//! Combat logging
//!
//! Records all combat events for display and post-run analysis.

use bevy::prelude::*;
use std::io::Write;

/// A single entry in the combat log
#[derive(Debug, Clone)]
pub struct CombatLogEntry {
    /// Timestamp in simulation time (seconds since scenario start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Healing done
    Healing,
    /// Ability used
    AbilityUsed,
    /// Status effect applied or removed (stun, knockback, immunity, slow)
    Status,
    /// Rift spawned
    RiftSpawned,
    /// Rift destroyed
    RiftDestroyed,
    /// Actor died
    Death,
    /// Scenario event (start, end, etc.)
    ScenarioEvent,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current simulation time
    pub sim_time: f32,
}

impl CombatLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sim_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.sim_time,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Save the log to a text file.
    ///
    /// Returns the path written to. When `output_path` is None a timestamped
    /// filename in the working directory is used.
    pub fn save_to_file(&self, header: &str, output_path: Option<&str>) -> Result<String, String> {
        let filename = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map_err(|e| format!("System clock error: {}", e))?
                    .as_secs();
                format!("riftsim_log_{}.txt", stamp)
            }
        };

        let mut file = std::fs::File::create(&filename)
            .map_err(|e| format!("Failed to create {}: {}", filename, e))?;

        writeln!(file, "{}", header).map_err(|e| format!("Failed to write log: {}", e))?;
        writeln!(file, "{}", "-".repeat(60)).map_err(|e| format!("Failed to write log: {}", e))?;

        for entry in &self.entries {
            writeln!(
                file,
                "[{:8.2}] {:?}: {}",
                entry.timestamp, entry.event_type, entry.message
            )
            .map_err(|e| format!("Failed to write log: {}", e))?;
        }

        Ok(filename)
    }
}

/// Advance the log clock once per tick so entries carry simulation timestamps.
pub fn advance_log_time(time: Res<Time>, mut log: ResMut<CombatLog>) {
    log.sim_time += time.delta_secs();
}
