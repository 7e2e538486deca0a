//! Combat event resolution
//!
//! Applies queued health changes and knockbacks to their targets, enforcing
//! immunity gates and recording everything in the combat log.

use bevy::prelude::*;

use crate::actor::{ActorLabel, Health, HealthChange, StatusEffects, Velocity};

use super::events::{HealthChangeEvent, KnockbackEvent};
use super::log::{CombatLog, CombatLogEventType};

/// Apply queued health changes. Damage against immune targets is suppressed
/// and logged at debug level; deaths are logged exactly once.
pub fn process_health_changes(
    mut events: EventReader<HealthChangeEvent>,
    mut combat_log: ResMut<CombatLog>,
    mut targets: Query<(&mut Health, &StatusEffects, &ActorLabel)>,
) {
    for event in events.read() {
        let Ok((mut health, status, label)) = targets.get_mut(event.target) else {
            continue;
        };

        match health.change(event.amount, status.is_immune()) {
            HealthChange::SuppressedByImmunity => {
                debug!("{} is immune to {}", label.0, event.ability_name);
            }
            HealthChange::Applied { died } => {
                let kind = if event.amount < 0.0 {
                    CombatLogEventType::Damage
                } else {
                    CombatLogEventType::Healing
                };
                combat_log.log(
                    kind,
                    format!(
                        "{} {} {} for {:.0} ({:.0}/{:.0} left)",
                        event.ability_name,
                        if event.amount < 0.0 { "hits" } else { "heals" },
                        label.0,
                        event.amount.abs(),
                        health.current(),
                        health.max(),
                    ),
                );

                if died {
                    combat_log.log(
                        CombatLogEventType::Death,
                        format!("{} has been eliminated", label.0),
                    );
                }
            }
        }
        health.debug_validate();
    }
}

/// Apply queued knockbacks: immune targets shrug them off; everyone else is
/// stunned with drag and their velocity replaced by the impulse.
pub fn process_knockbacks(
    mut events: EventReader<KnockbackEvent>,
    mut combat_log: ResMut<CombatLog>,
    mut targets: Query<(&mut StatusEffects, &mut Velocity, &ActorLabel)>,
) {
    for event in events.read() {
        let Ok((mut status, mut velocity, label)) = targets.get_mut(event.target) else {
            continue;
        };

        if !status.apply_knockback(event.duration) {
            debug!("{} is immune to knockback", label.0);
            continue;
        }

        velocity.0 = event.impulse;
        combat_log.log(
            CombatLogEventType::Status,
            format!("{} is knocked back", label.0),
        );
    }
}
