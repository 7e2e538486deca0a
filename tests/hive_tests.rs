//! End-to-end tests of the Hive ability state machine.
//!
//! Each test drives a minimal headless app with a fixed manual time step,
//! feeds it input events, and inspects component state directly.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use riftsim::actor::{
    AbilityCharges, AbilityInput, ActorBundle, AimPoint, Health, MoveInput, StatusEffects, Velocity,
};
use riftsim::combat::events::HealthChangeEvent;
use riftsim::hive::{hive_bundle, rift_transform, Hive, HiveConfig, Rift, UltimateChannel};
use riftsim::{GameRng, SimulationPlugin};

const TICK: Duration = Duration::from_micros(16_667); // 60 Hz

fn test_app(cfg: HiveConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(TransformPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
        .insert_resource(cfg)
        .insert_resource(GameRng::from_seed(42))
        .add_plugins(SimulationPlugin);
    // First update initializes the clock with a zero delta
    app.update();
    app
}

fn spawn_hive(app: &mut App, position: Vec2) -> Entity {
    let cfg = app.world().resource::<HiveConfig>().clone();
    app.world_mut()
        .spawn(hive_bundle(&cfg, "Hive", position))
        .id()
}

fn spawn_dummy(app: &mut App, position: Vec2, max_health: f32) -> Entity {
    app.world_mut()
        .spawn(ActorBundle::new("Dummy", position, max_health, 0.0, 0.5, [1; 4]))
        .id()
}

/// Spawn a rift directly and register it with the Hive, bypassing ability 1.
fn register_rift(app: &mut App, hive: Entity, origin: Vec2, direction: Vec2) -> Entity {
    let cfg = app.world().resource::<HiveConfig>().clone();
    let transform = rift_transform(origin, direction, cfg.rift_length);
    let rift = app
        .world_mut()
        .spawn((transform, Rift::new(hive, cfg.rift_length, cfg.rift_width)))
        .id();
    app.world_mut()
        .get_mut::<Hive>(hive)
        .unwrap()
        .active_rifts
        .push(rift);
    rift
}

fn send_ability(app: &mut App, actor: Entity, slot: usize) {
    app.world_mut().send_event(AbilityInput { actor, slot });
}

fn set_aim(app: &mut App, point: Vec2) {
    app.world_mut().resource_mut::<AimPoint>().0 = point;
}

fn step(app: &mut App, seconds: f32) {
    let ticks = (seconds * 60.0).ceil() as u32;
    for _ in 0..ticks {
        app.update();
    }
}

fn rift_count(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut rifts = world.query::<&Rift>();
    rifts.iter(world).count()
}

fn position_of(app: &App, entity: Entity) -> Vec2 {
    app.world()
        .get::<Transform>(entity)
        .unwrap()
        .translation
        .truncate()
}

#[test]
fn ability1_spawns_rift_toward_aim_and_slows_owner() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    set_aim(&mut app, Vec2::new(2.5, 0.0));

    send_ability(&mut app, hive, 0);
    step(&mut app, 0.05);

    assert_eq!(rift_count(&mut app), 1);

    let state = app.world().get::<Hive>(hive).unwrap();
    assert_eq!(state.active_rifts.len(), 1);
    let rift = state.active_rifts[0];

    // Offset by half its length toward the aim point
    let center = position_of(&app, rift);
    assert!(center.distance(Vec2::new(1.0, 0.0)) < 1e-4);

    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!((status.move_speed_multiplier() - 0.94).abs() < 1e-5);

    let charges = app.world().get::<AbilityCharges>(hive).unwrap();
    assert_eq!(charges.charges(0), 0);
}

#[test]
fn rift_cap_blocks_spawns_without_consuming_charge() {
    let cfg = HiveConfig {
        ability_max_charges: [12, 1, 1, 1],
        ..Default::default()
    };
    let mut app = test_app(cfg);
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    set_aim(&mut app, Vec2::new(1.0, 0.0));

    for _ in 0..12 {
        send_ability(&mut app, hive, 0);
    }
    step(&mut app, 0.05);

    // Cap at 10; the last two presses were no-ops and kept their charges
    assert_eq!(rift_count(&mut app), 10);
    let charges = app.world().get::<AbilityCharges>(hive).unwrap();
    assert_eq!(charges.charges(0), 2);

    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!((status.move_speed_multiplier() - 0.4).abs() < 1e-4);
}

#[test]
fn ability2_dashes_through_the_endpoint_closest_to_aim() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);

    // Both rifts have an endpoint at the origin; one runs along +X, one
    // along +Y. Aiming mostly along +X must pick the +X rift.
    register_rift(&mut app, hive, Vec2::ZERO, Vec2::X);
    register_rift(&mut app, hive, Vec2::ZERO, Vec2::Y);
    set_aim(&mut app, Vec2::new(2.5, 0.4));

    send_ability(&mut app, hive, 1);
    step(&mut app, 0.02);

    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!(status.is_stunned());
    assert!(status.is_immune());
    let velocity = app.world().get::<Velocity>(hive).unwrap();
    assert!(velocity.0.x > 10.0);
    assert!(velocity.0.y.abs() < 1e-3);
    let charges = app.world().get::<AbilityCharges>(hive).unwrap();
    assert_eq!(charges.charges(1), 0);

    // The dash carries the actor one rift length along +X
    step(&mut app, 0.4);
    let position = position_of(&app, hive);
    assert!(position.x > 1.6 && position.x < 2.4, "got {:?}", position);
    assert!(position.y.abs() < 1e-3);

    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!(!status.is_stunned());
    assert!(!status.is_immune());
}

#[test]
fn ability2_without_endpoints_in_range_keeps_its_charge() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    register_rift(&mut app, hive, Vec2::new(5.0, 0.0), Vec2::X);
    set_aim(&mut app, Vec2::new(5.0, 0.0));

    send_ability(&mut app, hive, 1);
    step(&mut app, 0.05);

    let charges = app.world().get::<AbilityCharges>(hive).unwrap();
    assert_eq!(charges.charges(1), 1);
    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!(!status.is_stunned());
    assert!(position_of(&app, hive).distance(Vec2::ZERO) < 1e-4);
}

#[test]
fn detonation_destroys_snapshot_and_spares_fuse_spawns() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    let dummy = spawn_dummy(&mut app, Vec2::new(1.5, 0.0), 100.0);

    // Rift centered at (1, 0), dummy well inside its explosion radius
    let rift_a = register_rift(&mut app, hive, Vec2::ZERO, Vec2::X);

    send_ability(&mut app, hive, 2);
    step(&mut app, 0.2);

    // Spawned mid-fuse: not in the snapshot, must survive the destroy pass
    let rift_b = register_rift(&mut app, hive, Vec2::new(0.0, -5.0), Vec2::X);

    step(&mut app, 1.0);

    assert!(app.world().get::<Rift>(rift_a).is_none());
    let survivor = app.world().get::<Rift>(rift_b).unwrap();
    assert!(!survivor.exploded);
    let state = app.world().get::<Hive>(hive).unwrap();
    assert_eq!(state.active_rifts.as_slice(), &[rift_b]);

    // Dummy took exactly one hit and was knocked away from the center
    let health = app.world().get::<Health>(dummy).unwrap();
    assert!((health.current() - 80.0).abs() < 1e-4);
    assert!(position_of(&app, dummy).x > 1.5);

    // The owner is skipped even though it stands in the radius
    let hive_health = app.world().get::<Health>(hive).unwrap();
    assert!((hive_health.current() - 100.0).abs() < 1e-4);

    // Move-speed penalty resets to baseline with the blast
    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!((status.move_speed_multiplier() - 1.0).abs() < 1e-5);
}

#[test]
fn detonation_with_no_rifts_is_a_noop() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);

    send_ability(&mut app, hive, 2);
    step(&mut app, 0.05);

    let charges = app.world().get::<AbilityCharges>(hive).unwrap();
    assert_eq!(charges.charges(2), 1);
    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!(!status.is_stunned());
}

#[test]
fn ultimate_spawns_rifts_and_cancel_revokes_immunity_same_tick() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    set_aim(&mut app, Vec2::new(1.0, 0.0));

    send_ability(&mut app, hive, 3);
    step(&mut app, 0.05);
    assert!(app.world().get::<StatusEffects>(hive).unwrap().is_immune());
    assert!(app.world().get::<UltimateChannel>(hive).is_some());

    // Two spawn intervals elapse
    step(&mut app, 2.0);
    let spawned = rift_count(&mut app);
    assert!(spawned >= 2, "expected periodic spawns, got {}", spawned);

    // Casting ability 1 cancels the channel; immunity is gone after that
    // very tick, not when its original timer would have lapsed
    send_ability(&mut app, hive, 0);
    app.update();

    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!(!status.is_immune());
    assert!(app.world().get::<UltimateChannel>(hive).is_none());
    assert!(app.world().get::<Health>(hive).unwrap().indicator_visible());
    assert_eq!(rift_count(&mut app), spawned + 1);

    // No further periodic spawns after cancellation
    step(&mut app, 2.0);
    assert_eq!(rift_count(&mut app), spawned + 1);
}

#[test]
fn ultimate_timeout_revokes_immunity() {
    let cfg = HiveConfig {
        ultimate_duration: 1.0,
        ultimate_spawn_interval: 0.4,
        ..Default::default()
    };
    let mut app = test_app(cfg);
    let hive = spawn_hive(&mut app, Vec2::ZERO);

    send_ability(&mut app, hive, 3);
    step(&mut app, 0.5);
    assert!(app.world().get::<StatusEffects>(hive).unwrap().is_immune());

    step(&mut app, 1.0);
    let status = app.world().get::<StatusEffects>(hive).unwrap();
    assert!(!status.is_immune());
    assert!(app.world().get::<UltimateChannel>(hive).is_none());
    assert!(rift_count(&mut app) >= 2);
}

#[test]
fn stunned_ability_input_is_buffered_then_replayed() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    set_aim(&mut app, Vec2::new(1.0, 0.0));

    app.world_mut()
        .get_mut::<StatusEffects>(hive)
        .unwrap()
        .apply_stun(0.2, false);

    send_ability(&mut app, hive, 0);
    step(&mut app, 0.05);
    assert_eq!(rift_count(&mut app), 0, "input should be held during stun");

    // Stun ends before the buffer delay elapses, so the replay goes through
    step(&mut app, 0.4);
    assert_eq!(rift_count(&mut app), 1);
}

#[test]
fn buffered_input_is_dropped_if_still_stunned_at_replay() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    set_aim(&mut app, Vec2::new(1.0, 0.0));

    app.world_mut()
        .get_mut::<StatusEffects>(hive)
        .unwrap()
        .apply_stun(1.0, false);

    send_ability(&mut app, hive, 0);
    step(&mut app, 1.5);

    // Replayed once at 0.3s, still stunned, dropped for good
    assert_eq!(rift_count(&mut app), 0);
    let charges = app.world().get::<AbilityCharges>(hive).unwrap();
    assert_eq!(charges.charges(0), 1);
}

#[test]
fn click_to_move_walks_and_snaps_to_target() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);

    app.world_mut().send_event(MoveInput {
        actor: hive,
        position: Vec2::new(1.0, 0.0),
    });
    step(&mut app, 1.0);

    let position = position_of(&app, hive);
    assert!(position.distance(Vec2::new(1.0, 0.0)) < 0.05);
    let velocity = app.world().get::<Velocity>(hive).unwrap();
    assert!(velocity.0.length() < 1e-3);
}

#[test]
fn move_input_is_ignored_while_stunned() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);

    app.world_mut()
        .get_mut::<StatusEffects>(hive)
        .unwrap()
        .apply_stun(0.5, false);
    app.world_mut().send_event(MoveInput {
        actor: hive,
        position: Vec2::new(3.0, 0.0),
    });
    step(&mut app, 1.0);

    assert!(position_of(&app, hive).distance(Vec2::ZERO) < 1e-3);
}

#[test]
fn damage_is_suppressed_by_immunity_and_healing_clamps() {
    let mut app = test_app(HiveConfig::default());
    let hive = spawn_hive(&mut app, Vec2::ZERO);
    let dummy = spawn_dummy(&mut app, Vec2::new(3.0, 0.0), 100.0);

    // The ultimate channel makes the Hive immune; damage against it is a no-op
    send_ability(&mut app, hive, 3);
    step(&mut app, 0.05);
    app.world_mut().send_event(HealthChangeEvent {
        source: dummy,
        target: hive,
        amount: -30.0,
        ability_name: "test hit".to_string(),
    });
    app.update();
    assert!((app.world().get::<Health>(hive).unwrap().current() - 100.0).abs() < 1e-4);

    // The dummy has no immunity: damage lands, healing clamps at max
    app.world_mut().send_event(HealthChangeEvent {
        source: hive,
        target: dummy,
        amount: -30.0,
        ability_name: "test hit".to_string(),
    });
    app.update();
    assert!((app.world().get::<Health>(dummy).unwrap().current() - 70.0).abs() < 1e-4);

    app.world_mut().send_event(HealthChangeEvent {
        source: hive,
        target: dummy,
        amount: 50.0,
        ability_name: "test heal".to_string(),
    });
    app.update();
    assert!((app.world().get::<Health>(dummy).unwrap().current() - 100.0).abs() < 1e-4);

    // Lethal damage kills exactly once
    app.world_mut().send_event(HealthChangeEvent {
        source: hive,
        target: dummy,
        amount: -200.0,
        ability_name: "test hit".to_string(),
    });
    app.update();
    let health = app.world().get::<Health>(dummy).unwrap();
    assert!(!health.is_alive());
    assert_eq!(health.current(), 0.0);
}
