//! RiftSim - Hive Ability Sandbox
//!
//! A headless simulation of the Hive, a rift-weaving arena character:
//! placeable rift entities, a dash that travels through them, a delayed
//! mass detonation, and a channelled ultimate that seeds the arena with
//! rifts at random.
//!
//! This library exposes the core simulation modules for testing and reuse.

use bevy::prelude::*;

pub mod actor;
pub mod cli;
pub mod combat;
pub mod headless;
pub mod hive;
pub mod rng;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::ScenarioConfig;
pub use hive::{Hive, HiveConfig, Rift};
pub use rng::GameRng;

/// The complete simulation: phase ordering plus the actor base, combat
/// resolution, and the Hive ability state machine.
///
/// Expects a [`HiveConfig`] resource to be present; insert one (or add
/// [`hive::HiveConfigPlugin`]) before this plugin.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        actor::configure_sim_phases(app);
        app.add_plugins((actor::ActorPlugin, combat::CombatPlugin, hive::HivePlugin));
    }
}
