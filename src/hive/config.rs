//! Data-driven Hive tuning
//!
//! Hive ability numbers are defined in `assets/config/hive.ron` rather than
//! hardcoded, so balance changes don't require recompilation. The file is
//! loaded and validated at startup; tests use the hardcoded baseline from
//! `HiveConfig::default()`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actor::SLOT_COUNT;

/// Complete Hive character configuration.
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct HiveConfig {
    pub max_health: f32,
    /// Base movement speed in world units per second
    pub base_move_speed: f32,
    /// Half-width of the actor's collision footprint
    pub body_half_width: f32,

    /// Per-use cooldown for each ability slot (seconds)
    pub ability_cooldowns: [f32; SLOT_COUNT],
    /// Maximum charges per ability slot
    pub ability_max_charges: [u32; SLOT_COUNT],

    // === Rifts ===
    /// Rift length along its facing axis
    pub rift_length: f32,
    /// Rift width; endpoint half-width is half of this
    pub rift_width: f32,
    /// Cap on concurrently alive rifts
    pub max_active_rifts: usize,
    /// Additive move-speed penalty per active rift
    pub slow_per_rift: f32,

    // === Dash (ability 2) ===
    /// How long the dash stun/immunity lasts; dash speed is
    /// `rift_length / dash_duration`
    pub dash_duration: f32,

    // === Detonation (ability 3) ===
    /// Self-stun and fuse length before rifts explode
    pub explosion_delay: f32,
    /// How long the explosion collision window stays open
    pub explosion_duration: f32,
    /// Radius around each rift center that takes the hit
    pub explosion_radius: f32,
    /// Damage dealt to each actor caught in an explosion
    pub explosion_damage: f32,
    /// Knockback impulse magnitude, directed away from the rift center
    pub explosion_knockback_force: f32,
    /// Knockback stun duration on explosion victims
    pub explosion_knockback_duration: f32,

    // === Ultimate ===
    /// Channel length; self-immunity is granted for this long
    pub ultimate_duration: f32,
    /// Interval between periodic rift spawns during the channel
    pub ultimate_spawn_interval: f32,
    /// Rifts spawn within this radius of the actor
    pub ultimate_spawn_radius: f32,
}

impl HiveConfig {
    /// Range within which a rift endpoint is dashable: the actor's collision
    /// half-width plus the rift endpoint's half-width.
    pub fn ability2_range(&self) -> f32 {
        self.body_half_width + self.rift_width / 2.0
    }

    /// Check the configuration for nonsensical values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_health <= 0.0 {
            return Err(format!("max_health must be positive, got {}", self.max_health));
        }
        if self.rift_length <= 0.0 || self.rift_width <= 0.0 {
            return Err("rift dimensions must be positive".to_string());
        }
        if self.max_active_rifts == 0 {
            return Err("max_active_rifts must be at least 1".to_string());
        }
        if self.dash_duration <= 0.0 {
            return Err("dash_duration must be positive".to_string());
        }
        if self.explosion_delay < 0.0 || self.explosion_duration <= 0.0 {
            return Err("explosion timings must be positive".to_string());
        }
        if self.ultimate_duration <= 0.0 || self.ultimate_spawn_interval <= 0.0 {
            return Err("ultimate timings must be positive".to_string());
        }
        for (i, &cooldown) in self.ability_cooldowns.iter().enumerate() {
            if cooldown < 0.0 {
                return Err(format!("ability {} cooldown is negative: {}", i, cooldown));
            }
        }
        for (i, &max) in self.ability_max_charges.iter().enumerate() {
            if max == 0 {
                return Err(format!("ability {} must have at least one charge", i));
            }
        }
        Ok(())
    }
}

impl Default for HiveConfig {
    /// Hardcoded baseline matching `assets/config/hive.ron`.
    fn default() -> Self {
        Self {
            max_health: 100.0,
            base_move_speed: 2.5,
            body_half_width: 0.5,
            ability_cooldowns: [3.0, 1.0, 1.0, 1.0],
            ability_max_charges: [1, 1, 1, 1],
            rift_length: 2.0,
            rift_width: 0.5,
            max_active_rifts: 10,
            slow_per_rift: 0.06,
            dash_duration: 0.15,
            explosion_delay: 0.4,
            explosion_duration: 0.35,
            explosion_radius: 1.5,
            explosion_damage: 20.0,
            explosion_knockback_force: 6.0,
            explosion_knockback_duration: 0.25,
            ultimate_duration: 6.0,
            ultimate_spawn_interval: 0.75,
            ultimate_spawn_radius: 3.0,
        }
    }
}

/// Load the Hive configuration from `assets/config/hive.ron`.
pub fn load_hive_config() -> Result<HiveConfig, String> {
    let config_path = "assets/config/hive.ron";

    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read {}: {}", config_path, e))?;

    let config: HiveConfig =
        ron::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", config_path, e))?;

    config.validate()?;

    info!("Loaded Hive configuration from {}", config_path);
    Ok(config)
}

/// Bevy plugin loading the Hive configuration at startup.
/// Panics on a missing or invalid file so a bad config never runs silently.
pub struct HiveConfigPlugin;

impl Plugin for HiveConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_hive_config() {
            Ok(config) => {
                app.insert_resource(config);
            }
            Err(e) => panic!("Failed to load Hive configuration: {}", e),
        }
    }
}
