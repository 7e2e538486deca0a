//! Input intake
//!
//! Discrete input events ("use ability N", "move to P") enter the simulation
//! here. Ability inputs arriving while the actor is stunned are buffered for
//! a short delay and replayed once through the normal intake path; if the
//! actor is still stunned at replay time the input is dropped with a
//! diagnostic log, never queued indefinitely.

use bevy::prelude::*;

use super::charges::{AbilityCharges, SLOT_COUNT};
use super::movement::MoveTarget;
use super::status::StatusEffects;
use super::ActorLabel;

/// How long a stunned actor holds an ability input before replaying it.
pub const STUN_INPUT_BUFFER: f32 = 0.3;

/// Current aim point (cursor position in world space), written by the
/// external driver.
#[derive(Resource, Default, Clone, Copy)]
pub struct AimPoint(pub Vec2);

/// Request to use an ability slot, as received from the driver.
#[derive(Event, Debug, Clone, Copy)]
pub struct AbilityInput {
    pub actor: Entity,
    pub slot: usize,
}

/// Request to move an actor to a world position.
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveInput {
    pub actor: Entity,
    pub position: Vec2,
}

/// An ability input that passed the intake gates (valid slot, charge
/// available, actor not stunned) and should be executed by the character's
/// ability state machine this tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct AbilityDispatch {
    pub actor: Entity,
    pub slot: usize,
}

/// An ability input held while its actor is stunned.
#[derive(Component)]
pub struct BufferedAbility {
    pub actor: Entity,
    pub slot: usize,
    pub delay: f32,
}

/// Gate raw ability inputs: reject invalid slots, ignore charge-less slots,
/// buffer inputs for stunned actors, and forward the rest for execution.
pub fn intake_ability_input(
    mut commands: Commands,
    mut inputs: EventReader<AbilityInput>,
    mut dispatch: EventWriter<AbilityDispatch>,
    actors: Query<(&StatusEffects, &AbilityCharges, &ActorLabel)>,
) {
    for input in inputs.read() {
        if input.slot >= SLOT_COUNT {
            debug_assert!(false, "ability input with invalid slot {}", input.slot);
            error!("ability input with invalid slot {}", input.slot);
            continue;
        }

        let Ok((status, charges, label)) = actors.get(input.actor) else {
            warn!("ability input for unknown actor {:?}", input.actor);
            continue;
        };

        if !charges.is_ready(input.slot) {
            debug!("{}: ability {} has no charge", label.0, input.slot);
            continue;
        }

        if status.is_stunned() {
            debug!(
                "{}: buffering ability {} during stun",
                label.0, input.slot
            );
            commands.spawn(BufferedAbility {
                actor: input.actor,
                slot: input.slot,
                delay: STUN_INPUT_BUFFER,
            });
            continue;
        }

        dispatch.send(AbilityDispatch {
            actor: input.actor,
            slot: input.slot,
        });
    }
}

/// Replay buffered ability inputs once their delay elapses. Replayed inputs
/// re-check the charge and stun gates; a still-stunned actor drops the input.
pub fn replay_buffered_abilities(
    mut commands: Commands,
    time: Res<Time>,
    mut buffered: Query<(Entity, &mut BufferedAbility)>,
    mut dispatch: EventWriter<AbilityDispatch>,
    actors: Query<(&StatusEffects, &AbilityCharges, &ActorLabel)>,
) {
    let dt = time.delta_secs();

    for (entity, mut buffer) in buffered.iter_mut() {
        buffer.delay -= dt;
        if buffer.delay > 0.0 {
            continue;
        }

        // Replayed exactly once, whatever happens below
        commands.entity(entity).despawn();

        let Ok((status, charges, label)) = actors.get(buffer.actor) else {
            continue;
        };

        if status.is_stunned() {
            info!(
                "{}: dropping buffered ability {}, still stunned at replay",
                label.0, buffer.slot
            );
            continue;
        }

        if !charges.is_ready(buffer.slot) {
            debug!(
                "{}: buffered ability {} lost its charge before replay",
                label.0, buffer.slot
            );
            continue;
        }

        dispatch.send(AbilityDispatch {
            actor: buffer.actor,
            slot: buffer.slot,
        });
    }
}

/// Apply move inputs to actor move targets. Move inputs are ignored while
/// the actor is stunned, matching the ability intake gate.
pub fn apply_move_input(
    mut inputs: EventReader<MoveInput>,
    mut actors: Query<(&StatusEffects, &mut MoveTarget)>,
) {
    for input in inputs.read() {
        let Ok((status, mut target)) = actors.get_mut(input.actor) else {
            warn!("move input for unknown actor {:?}", input.actor);
            continue;
        };

        if status.is_stunned() {
            continue;
        }

        target.0 = input.position;
    }
}
