//! Shared actor base
//!
//! Every actor in the arena owns exactly one of each component defined
//! under this module: health, status effects, ability charges, and
//! click-to-move movement state. Character-specific ability state machines
//! (the Hive) are layered on top of this base.
//!
//! All timers advance once per tick from `Res<Time>`; there is no
//! parallelism and every component belongs exclusively to its actor.

pub mod charges;
pub mod health;
pub mod input;
pub mod movement;
pub mod status;

pub use charges::{AbilityCharges, SLOT_COUNT};
pub use health::{Health, HealthChange};
pub use input::{AbilityDispatch, AbilityInput, AimPoint, MoveInput};
pub use movement::{MoveTarget, Movement, Velocity};
pub use status::{StatusEffects, StatusExpirations};

use bevy::prelude::*;

/// Human-readable actor name for log messages.
#[derive(Component, Clone)]
pub struct ActorLabel(pub String);

/// Collision footprint of the actor body, as a half-width in world units.
/// Used for rift endpoint range checks.
#[derive(Component, Clone, Copy)]
pub struct ActorBody {
    pub half_width: f32,
}

/// Simulation phases, chained in declaration order every tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimPhase {
    /// Input intake: buffering, replay, move targets
    Intake,
    /// Character ability state machines execute dispatched abilities
    Abilities,
    /// Multi-phase ability sequences advance (detonation, ultimate channel)
    Sequences,
    /// Health/knockback events resolve
    Resolution,
    /// Charge and status-effect timers advance
    Tick,
    /// Movement decision and integration
    Movement,
}

/// Everything a plain actor needs to participate in the simulation.
#[derive(Bundle)]
pub struct ActorBundle {
    pub label: ActorLabel,
    pub transform: Transform,
    pub health: Health,
    pub status: StatusEffects,
    pub charges: AbilityCharges,
    pub movement: Movement,
    pub target: MoveTarget,
    pub velocity: Velocity,
    pub body: ActorBody,
}

impl ActorBundle {
    pub fn new(
        label: &str,
        position: Vec2,
        max_health: f32,
        base_speed: f32,
        half_width: f32,
        max_charges: [u32; SLOT_COUNT],
    ) -> Self {
        Self {
            label: ActorLabel(label.to_string()),
            transform: Transform::from_translation(position.extend(0.0)),
            health: Health::new(max_health),
            status: StatusEffects::default(),
            charges: AbilityCharges::new(max_charges),
            movement: Movement { base_speed },
            // Actors start standing still: the move target is their spawn point
            target: MoveTarget(position),
            velocity: Velocity::default(),
            body: ActorBody { half_width },
        }
    }
}

/// Plugin wiring the shared actor systems and input events.
pub struct ActorPlugin;

impl Plugin for ActorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AbilityInput>()
            .add_event::<MoveInput>()
            .add_event::<AbilityDispatch>()
            .init_resource::<AimPoint>()
            .add_systems(
                Update,
                (
                    input::intake_ability_input,
                    input::replay_buffered_abilities,
                    input::apply_move_input,
                )
                    .in_set(SimPhase::Intake),
            )
            .add_systems(
                Update,
                (tick_ability_charges, tick_status_effects).in_set(SimPhase::Tick),
            )
            .add_systems(
                Update,
                (update_movement, integrate_motion).chain().in_set(SimPhase::Movement),
            );
    }
}

/// Configure the per-tick phase ordering. Called once by the top-level
/// simulation plugin before any systems are added.
pub fn configure_sim_phases(app: &mut App) {
    app.configure_sets(
        Update,
        (
            SimPhase::Intake,
            SimPhase::Abilities,
            SimPhase::Sequences,
            SimPhase::Resolution,
            SimPhase::Tick,
            SimPhase::Movement,
        )
            .chain(),
    );
}

/// Advance charge regeneration for every actor.
fn tick_ability_charges(time: Res<Time>, mut actors: Query<&mut AbilityCharges>) {
    let dt = time.delta_secs();
    for mut charges in actors.iter_mut() {
        charges.advance(dt);
        charges.debug_validate();
    }
}

/// Advance status-effect timers and apply their expiry consequences:
/// expiring stuns and knockbacks halt the actor and reset its move target
/// to wherever it ended up; expiring immunity restores the health indicator
/// for living actors.
fn tick_status_effects(
    time: Res<Time>,
    mut actors: Query<(
        &mut StatusEffects,
        &mut Health,
        &mut MoveTarget,
        &mut Velocity,
        &Transform,
    )>,
) {
    let dt = time.delta_secs();

    for (mut status, mut health, mut target, mut velocity, transform) in actors.iter_mut() {
        let expired = status.advance(dt);

        if expired.stun || expired.knockback {
            velocity.0 = Vec2::ZERO;
            target.0 = transform.translation.truncate();
        }
        if expired.immunity && health.is_alive() {
            health.set_indicator_visible(true);
        }
    }
}

/// Decide each actor's velocity from its move target. Stunned actors are
/// skipped entirely so dash and knockback velocities survive until the stun
/// clears.
fn update_movement(
    mut actors: Query<(
        &Movement,
        &MoveTarget,
        &StatusEffects,
        &Transform,
        &mut Velocity,
    )>,
) {
    for (movement, target, status, transform, mut velocity) in actors.iter_mut() {
        if status.is_stunned() {
            continue;
        }
        velocity.0 = movement::desired_velocity(
            transform.translation.truncate(),
            target.0,
            movement.base_speed,
            status.move_speed_multiplier(),
        );
    }
}

/// Euler-integrate positions and apply knockback drag.
fn integrate_motion(
    time: Res<Time>,
    mut actors: Query<(&mut Transform, &mut Velocity, &StatusEffects)>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut velocity, status) in actors.iter_mut() {
        transform.translation += velocity.0.extend(0.0) * dt;

        let drag = status.drag();
        if drag > 0.0 {
            velocity.0 *= (1.0 - drag * dt).max(0.0);
        }
    }
}
