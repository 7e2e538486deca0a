//! The Hive character
//!
//! The Hive's four abilities are built from the shared actor base:
//!
//! - **Ability 1** opens a rift toward the aim point (capped at 10 active)
//! - **Ability 2** dashes through the nearest-to-aim rift endpoint in range
//! - **Ability 3** detonates all active rifts after a short fuse
//! - **Ultimate** channels, spawning rifts at random nearby positions while
//!   the Hive is immune
//!
//! Multi-phase abilities are explicit state machines: a phase tag plus a
//! remaining-time counter on a component, advanced once per tick. A self-stun
//! from a dash or detonation blocks new ability intake but never the already
//! scheduled continuation of the ability that caused it.

pub mod config;
pub mod rift;

pub use config::{load_hive_config, HiveConfig, HiveConfigPlugin};
pub use rift::{rift_transform, Rift};

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::actor::status::{end_immunity, grant_immunity};
use crate::actor::{
    AbilityCharges, AbilityDispatch, ActorBody, ActorBundle, ActorLabel, AimPoint, Health,
    SimPhase, StatusEffects, Velocity,
};
use crate::combat::events::{HealthChangeEvent, KnockbackEvent};
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::rng::GameRng;

/// Per-Hive ability state: the owned list of active rifts.
#[derive(Component, Default)]
pub struct Hive {
    /// Rifts currently alive, in spawn order. Capped at
    /// `HiveConfig::max_active_rifts`.
    pub active_rifts: SmallVec<[Entity; 10]>,
    /// Lifetime spawn counter, for scenario reporting
    pub rifts_spawned: u32,
}

/// Ultimate channel in progress. Removed on timeout or when abilities 1-3
/// cancel it.
#[derive(Component)]
pub struct UltimateChannel {
    pub remaining: f32,
    pub spawn_timer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetonationPhase {
    /// Fuse burning; rifts spawned during this phase escape the blast
    Delay,
    /// Explosion collision window open
    Explosion,
}

/// Detonation sequence state for ability 3.
///
/// The snapshot is taken at cast time: exactly those rifts explode and are
/// later destroyed, regardless of what spawns meanwhile.
#[derive(Component)]
pub struct DetonationSequence {
    pub phase: DetonationPhase,
    pub remaining: f32,
    pub snapshot: SmallVec<[Entity; 10]>,
}

/// A dashable rift endpoint with the direction the dash would travel
/// (from the endpoint through the rift center).
#[derive(Debug, Clone, Copy)]
pub struct DashCandidate {
    pub endpoint: Vec2,
    pub direction: Vec2,
}

/// Pick the candidate whose dash direction has the minimum angle to the aim
/// direction. Ties go to the first candidate encountered.
pub fn select_dash_target(candidates: &[DashCandidate], aim_direction: Vec2) -> Option<&DashCandidate> {
    let mut best: Option<(&DashCandidate, f32)> = None;
    for candidate in candidates {
        let angle = aim_direction
            .dot(candidate.direction)
            .clamp(-1.0, 1.0)
            .acos();
        match best {
            Some((_, best_angle)) if angle >= best_angle => {}
            _ => best = Some((candidate, angle)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Components for spawning a Hive actor at `position`.
pub fn hive_bundle(cfg: &HiveConfig, label: &str, position: Vec2) -> (ActorBundle, Hive) {
    (
        ActorBundle::new(
            label,
            position,
            cfg.max_health,
            cfg.base_move_speed,
            cfg.body_half_width,
            cfg.ability_max_charges,
        ),
        Hive::default(),
    )
}

/// Plugin wiring the Hive ability state machine.
pub struct HivePlugin;

impl Plugin for HivePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameRng>()
            .add_systems(
                Update,
                execute_hive_abilities.in_set(SimPhase::Abilities),
            )
            .add_systems(
                Update,
                (tick_ultimate, tick_detonation)
                    .chain()
                    .in_set(SimPhase::Sequences),
            );
    }
}

/// Spawn one rift and register it with its owner: the rift enters the
/// active list and the owner picks up the per-rift move-speed penalty
/// (bypassing immunity, since it is self-inflicted).
fn spawn_rift(
    commands: &mut Commands,
    combat_log: &mut CombatLog,
    cfg: &HiveConfig,
    owner: Entity,
    hive: &mut Hive,
    status: &mut StatusEffects,
    label: &ActorLabel,
    transform: Transform,
) -> Entity {
    let entity = commands
        .spawn((transform, Rift::new(owner, cfg.rift_length, cfg.rift_width)))
        .id();
    hive.active_rifts.push(entity);
    hive.rifts_spawned += 1;
    status.change_move_speed(-cfg.slow_per_rift, false, true);
    combat_log.log(
        CombatLogEventType::RiftSpawned,
        format!("{} opens a rift ({} active)", label.0, hive.active_rifts.len()),
    );
    entity
}

/// Execute dispatched ability inputs on the Hive state machine.
///
/// Starting abilities 1-3 cancels an in-flight ultimate channel by request;
/// nothing else preemptively kills pending sequence steps.
#[allow(clippy::too_many_arguments)]
fn execute_hive_abilities(
    mut commands: Commands,
    mut dispatches: EventReader<AbilityDispatch>,
    aim: Res<AimPoint>,
    cfg: Res<HiveConfig>,
    mut combat_log: ResMut<CombatLog>,
    mut hives: Query<(
        Entity,
        &mut Hive,
        &mut AbilityCharges,
        &mut StatusEffects,
        &mut Health,
        &mut Transform,
        &mut Velocity,
        Option<&UltimateChannel>,
        Option<&DetonationSequence>,
        &ActorBody,
        &ActorLabel,
    )>,
    rifts: Query<(&Rift, &Transform), Without<Hive>>,
) {
    for dispatch in dispatches.read() {
        let Ok((
            entity,
            mut hive,
            mut charges,
            mut status,
            mut health,
            mut transform,
            mut velocity,
            ultimate,
            detonation,
            body,
            label,
        )) = hives.get_mut(dispatch.actor)
        else {
            debug!("actor {:?} has no ability state machine", dispatch.actor);
            continue;
        };

        // Intake already gated on charges, but buffered replays can race a
        // consumption; re-check rather than hitting the try_consume error path.
        if !charges.is_ready(dispatch.slot) {
            debug!("{}: ability {} has no charge", label.0, dispatch.slot);
            continue;
        }

        let origin = transform.translation.truncate();
        let aim_direction = (aim.0 - origin).normalize_or(Vec2::Y);
        let ultimate_active = ultimate.is_some();

        match dispatch.slot {
            // Ability 1: open a rift toward the aim point
            0 => {
                if hive.active_rifts.len() >= cfg.max_active_rifts {
                    info!("{}: rift cap reached, not spawning", label.0);
                    continue;
                }

                cancel_ultimate(
                    &mut commands,
                    &mut combat_log,
                    entity,
                    ultimate_active,
                    &mut status,
                    &mut health,
                    label,
                );

                spawn_rift(
                    &mut commands,
                    &mut combat_log,
                    &cfg,
                    entity,
                    &mut hive,
                    &mut status,
                    label,
                    rift_transform(origin, aim_direction, cfg.rift_length),
                );

                charges.try_consume(0, cfg.ability_cooldowns[0]);
                combat_log.log(
                    CombatLogEventType::AbilityUsed,
                    format!("{} uses Rift", label.0),
                );
            }

            // Ability 2: dash through the rift endpoint closest to the aim
            1 => {
                let range = body.half_width + cfg.rift_width / 2.0;
                let mut candidates: Vec<DashCandidate> = Vec::new();

                for &rift_entity in &hive.active_rifts {
                    let Ok((rift, rift_transform)) = rifts.get(rift_entity) else {
                        continue;
                    };
                    let center = rift_transform.translation.truncate();
                    for endpoint in rift.endpoints(rift_transform) {
                        if endpoint.distance(origin) <= range {
                            candidates.push(DashCandidate {
                                endpoint,
                                direction: (center - endpoint).normalize_or_zero(),
                            });
                        }
                    }
                }

                let Some(target) = select_dash_target(&candidates, aim_direction) else {
                    info!("{}: no rift endpoints in range", label.0);
                    continue;
                };
                let target = *target;

                cancel_ultimate(
                    &mut commands,
                    &mut combat_log,
                    entity,
                    ultimate_active,
                    &mut status,
                    &mut health,
                    label,
                );

                transform.translation = target.endpoint.extend(transform.translation.z);

                // Self-inflicted, so the stun bypasses the dash immunity
                status.apply_stun(cfg.dash_duration, true);
                grant_immunity(&mut status, &mut health, cfg.dash_duration);
                velocity.0 = (cfg.rift_length / cfg.dash_duration) * target.direction;

                charges.try_consume(1, cfg.ability_cooldowns[1]);
                combat_log.log(
                    CombatLogEventType::AbilityUsed,
                    format!("{} dashes through a rift", label.0),
                );
            }

            // Ability 3: detonate all active rifts after a fuse
            2 => {
                if hive.active_rifts.is_empty() {
                    info!("{}: no rifts to detonate", label.0);
                    continue;
                }
                if detonation.is_some() {
                    debug!("{}: detonation already in progress", label.0);
                    continue;
                }

                cancel_ultimate(
                    &mut commands,
                    &mut combat_log,
                    entity,
                    ultimate_active,
                    &mut status,
                    &mut health,
                    label,
                );

                status.apply_stun(cfg.explosion_delay, true);
                velocity.0 = Vec2::ZERO;
                // The kill-set is fixed now: rifts spawned during the fuse are
                // not part of this detonation and survive it
                commands.entity(entity).insert(DetonationSequence {
                    phase: DetonationPhase::Delay,
                    remaining: cfg.explosion_delay,
                    snapshot: hive.active_rifts.clone(),
                });

                charges.try_consume(2, cfg.ability_cooldowns[2]);
                combat_log.log(
                    CombatLogEventType::AbilityUsed,
                    format!("{} detonates their rifts", label.0),
                );
            }

            // Ultimate: timed channel of periodic rift spawns
            3 => {
                commands.entity(entity).insert(UltimateChannel {
                    remaining: cfg.ultimate_duration,
                    spawn_timer: cfg.ultimate_spawn_interval,
                });
                grant_immunity(&mut status, &mut health, cfg.ultimate_duration);

                charges.try_consume(3, cfg.ability_cooldowns[3]);
                combat_log.log(
                    CombatLogEventType::AbilityUsed,
                    format!("{} begins channelling", label.0),
                );
            }

            // Intake validates slot indices; anything else is a programmer error
            _ => {
                debug_assert!(false, "dispatched invalid ability slot {}", dispatch.slot);
                error!("dispatched invalid ability slot {}", dispatch.slot);
            }
        }
    }
}

/// Cancel an in-flight ultimate channel, explicitly revoking the immunity it
/// granted so follow-up abilities are never blocked by stale immunity state.
fn cancel_ultimate(
    commands: &mut Commands,
    combat_log: &mut CombatLog,
    entity: Entity,
    active: bool,
    status: &mut StatusEffects,
    health: &mut Health,
    label: &ActorLabel,
) {
    if !active {
        return;
    }
    commands.entity(entity).remove::<UltimateChannel>();
    end_immunity(status, health);
    combat_log.log(
        CombatLogEventType::Status,
        format!("{} cancels their channel", label.0),
    );
}

/// Advance ultimate channels: spawn a rift every interval until the channel
/// duration elapses, then end the mode and revoke its immunity.
fn tick_ultimate(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<HiveConfig>,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
    mut hives: Query<(
        Entity,
        &mut Hive,
        &mut UltimateChannel,
        &mut StatusEffects,
        &mut Health,
        &Transform,
        &ActorLabel,
    )>,
) {
    let dt = time.delta_secs();

    for (entity, mut hive, mut channel, mut status, mut health, transform, label) in
        hives.iter_mut()
    {
        channel.remaining -= dt;
        channel.spawn_timer -= dt;

        while channel.spawn_timer <= 0.0 {
            channel.spawn_timer += cfg.ultimate_spawn_interval;

            if hive.active_rifts.len() >= cfg.max_active_rifts {
                debug!("{}: rift cap reached during channel", label.0);
                continue;
            }

            let position = transform.translation.truncate()
                + rng.random_in_circle(cfg.ultimate_spawn_radius);
            let rotation = Quat::from_rotation_z(rng.random_angle());
            spawn_rift(
                &mut commands,
                &mut combat_log,
                &cfg,
                entity,
                &mut hive,
                &mut status,
                label,
                Transform::from_translation(position.extend(0.0)).with_rotation(rotation),
            );
        }

        if channel.remaining <= 0.0 {
            commands.entity(entity).remove::<UltimateChannel>();
            end_immunity(&mut status, &mut health);
            combat_log.log(
                CombatLogEventType::Status,
                format!("{} finishes channelling", label.0),
            );
        }
    }
}

/// Advance detonation sequences.
///
/// When the fuse expires the snapshotted rifts explode, leave the active
/// list immediately, and are destroyed when the explosion window closes.
/// Rifts spawned during the fuse are not in the snapshot and survive the
/// destroy pass. During the window each exploding rift
/// damages and knocks back every actor in its radius once, skipping its
/// owner.
#[allow(clippy::too_many_arguments)]
fn tick_detonation(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<HiveConfig>,
    mut combat_log: ResMut<CombatLog>,
    mut hives: Query<(
        Entity,
        &mut Hive,
        &mut DetonationSequence,
        &mut StatusEffects,
        &ActorLabel,
    )>,
    mut rifts: Query<(&mut Rift, &Transform)>,
    actors: Query<(Entity, &Transform), (With<Health>, Without<Rift>)>,
    mut health_events: EventWriter<HealthChangeEvent>,
    mut knockbacks: EventWriter<KnockbackEvent>,
) {
    let dt = time.delta_secs();

    for (entity, mut hive, mut sequence, mut status, label) in hives.iter_mut() {
        let mut just_triggered = false;

        if sequence.phase == DetonationPhase::Delay {
            sequence.remaining -= dt;
            if sequence.remaining <= 0.0 {
                // Exactly the snapshotted rifts explode and leave the active
                // list; anything spawned during the fuse stays
                hive.active_rifts
                    .retain(|rift_entity| !sequence.snapshot.contains(rift_entity));
                for &rift_entity in &sequence.snapshot {
                    if let Ok((mut rift, _)) = rifts.get_mut(rift_entity) {
                        rift.exploded = true;
                    }
                }
                combat_log.log(
                    CombatLogEventType::Status,
                    format!("{}'s rifts explode ({})", label.0, sequence.snapshot.len()),
                );
                sequence.phase = DetonationPhase::Explosion;
                sequence.remaining = cfg.explosion_duration;
                just_triggered = true;
            }
        }

        if sequence.phase == DetonationPhase::Explosion {
            // Collision pass: each rift hits each actor at most once over
            // the whole window
            for &rift_entity in &sequence.snapshot {
                let Ok((mut rift, rift_transform)) = rifts.get_mut(rift_entity) else {
                    continue;
                };
                let center = rift_transform.translation.truncate();

                for (actor, actor_transform) in actors.iter() {
                    if actor == rift.owner || rift.hit_actors.contains(&actor) {
                        continue;
                    }
                    let actor_pos = actor_transform.translation.truncate();
                    if actor_pos.distance(center) > cfg.explosion_radius {
                        continue;
                    }

                    rift.hit_actors.push(actor);
                    health_events.send(HealthChangeEvent {
                        source: rift.owner,
                        target: actor,
                        amount: -cfg.explosion_damage,
                        ability_name: "Rift detonation".to_string(),
                    });
                    knockbacks.send(KnockbackEvent {
                        target: actor,
                        duration: cfg.explosion_knockback_duration,
                        impulse: (actor_pos - center).normalize_or(Vec2::X)
                            * cfg.explosion_knockback_force,
                    });
                }
            }

            if !just_triggered {
                sequence.remaining -= dt;
            }

            if sequence.remaining <= 0.0 {
                for &rift_entity in &sequence.snapshot {
                    commands.entity(rift_entity).despawn();
                }
                combat_log.log(
                    CombatLogEventType::RiftDestroyed,
                    format!("{} rifts collapse", sequence.snapshot.len()),
                );

                // The per-rift penalty goes back to baseline with the blast
                status.change_move_speed(0.0, true, true);
                commands.entity(entity).remove::<DetonationSequence>();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn candidate_at_angle(degrees: f32) -> DashCandidate {
        let radians = degrees * PI / 180.0;
        DashCandidate {
            endpoint: Vec2::ZERO,
            direction: Vec2::from_angle(radians),
        }
    }

    #[test]
    fn dash_selects_smallest_angle_to_aim() {
        let aim = Vec2::X;
        let near = candidate_at_angle(10.0);
        let far = candidate_at_angle(80.0);

        // Both iteration orders pick the 10-degree endpoint
        let candidates = [near, far];
        let chosen = select_dash_target(&candidates, aim).unwrap();
        assert!((chosen.direction - near.direction).length() < 1e-6);

        let candidates = [far, near];
        let chosen = select_dash_target(&candidates, aim).unwrap();
        assert!((chosen.direction - near.direction).length() < 1e-6);
    }

    #[test]
    fn dash_selection_ties_go_to_first_candidate() {
        let aim = Vec2::X;
        let left = candidate_at_angle(30.0);
        let right = candidate_at_angle(-30.0);

        let candidates = [left, right];
        let chosen = select_dash_target(&candidates, aim).unwrap();
        assert!((chosen.direction - left.direction).length() < 1e-6);
    }

    #[test]
    fn dash_selection_on_empty_set_is_none() {
        assert!(select_dash_target(&[], Vec2::X).is_none());
    }
}
