//! Combat resolution and logging
//!
//! Health-change and knockback events queued by ability state machines are
//! resolved here, after abilities and sequences have run for the tick.

use bevy::prelude::*;

pub mod events;
pub mod log;
pub mod systems;

use crate::actor::SimPhase;
use events::{HealthChangeEvent, KnockbackEvent};

/// Plugin for combat event resolution and the combat log.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthChangeEvent>()
            .add_event::<KnockbackEvent>()
            .init_resource::<log::CombatLog>()
            .add_systems(
                Update,
                (systems::process_health_changes, systems::process_knockbacks)
                    .in_set(SimPhase::Resolution),
            )
            .add_systems(Update, log::advance_log_time.in_set(SimPhase::Tick));
    }
}
