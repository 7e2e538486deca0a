//! Headless scenario execution
//!
//! Runs scripted scenarios without any graphical output at a fixed 60 Hz
//! step, suitable for automated testing.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::actor::{AbilityInput, ActorBundle, ActorLabel, AimPoint, Health, MoveInput, SimPhase};
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::hive::{hive_bundle, Hive, HiveConfig, HiveConfigPlugin, Rift};
use crate::rng::GameRng;
use crate::SimulationPlugin;

use super::config::{CommandKind, ScenarioConfig, ScriptedCommand};

const TICK: Duration = Duration::from_micros(16_667); // 60 Hz

/// Result of a completed scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub hive: ActorReport,
    pub dummies: Vec<ActorReport>,
    /// Rifts still alive when the scenario ended
    pub rifts_alive: usize,
    /// Total rifts spawned over the run
    pub rifts_spawned: u32,
    /// Scenario clock at the end of the run
    pub elapsed: f32,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Final state of a single actor.
#[derive(Debug, Clone)]
pub struct ActorReport {
    pub name: String,
    pub max_health: f32,
    pub final_health: f32,
    pub survived: bool,
    pub final_position: (f32, f32),
}

/// Resource tracking scenario progress.
#[derive(Resource)]
pub struct ScenarioState {
    pub max_duration: f32,
    pub elapsed: f32,
    /// Index of the next unfired script command
    pub next_command: usize,
    pub complete: bool,
    pub output_path: Option<String>,
    pub random_seed: Option<u64>,
    pub result: Option<ScenarioResult>,
}

/// The scripted command list, fixed for the run.
#[derive(Resource)]
struct ScenarioScript {
    commands: Vec<ScriptedCommand>,
}

/// Entities spawned for the scenario.
#[derive(Resource)]
struct ScenarioActors {
    hive: Entity,
    dummies: Vec<Entity>,
}

/// Plugin executing one scripted scenario.
pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => GameRng::from_entropy(),
        };

        app.insert_resource(rng)
            .insert_resource(ScenarioState {
                max_duration: self.config.max_duration_secs,
                elapsed: 0.0,
                next_command: 0,
                complete: false,
                output_path: self.config.output_path.clone(),
                random_seed: self.config.random_seed,
                result: None,
            })
            .insert_resource(ScenarioScript {
                commands: self.config.script.clone(),
            })
            .insert_resource(SpawnLayout {
                hive_spawn: Vec2::from(self.config.hive_spawn),
                dummies: self.config.dummies.clone(),
            })
            .add_systems(Startup, setup_scenario)
            .add_systems(Update, drive_script.before(SimPhase::Intake))
            .add_systems(Update, check_scenario_end.after(SimPhase::Movement));
    }
}

/// Initial positions, consumed once by `setup_scenario`.
#[derive(Resource)]
struct SpawnLayout {
    hive_spawn: Vec2,
    dummies: Vec<super::config::DummySpawn>,
}

fn setup_scenario(
    mut commands: Commands,
    layout: Res<SpawnLayout>,
    cfg: Res<HiveConfig>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::ScenarioEvent,
        "Scenario started (headless mode)".to_string(),
    );

    let hive = commands
        .spawn(hive_bundle(&cfg, "Hive", layout.hive_spawn))
        .id();

    let dummies = layout
        .dummies
        .iter()
        .enumerate()
        .map(|(i, dummy)| {
            commands
                .spawn(ActorBundle::new(
                    &format!("Dummy {}", i + 1),
                    Vec2::from(dummy.position),
                    dummy.max_health,
                    0.0,
                    cfg.body_half_width,
                    [1; crate::actor::SLOT_COUNT],
                ))
                .id()
        })
        .collect::<Vec<_>>();

    info!(
        "Scenario setup complete: 1 Hive, {} target dummies",
        dummies.len()
    );
    commands.insert_resource(ScenarioActors { hive, dummies });
    commands.remove_resource::<SpawnLayout>();
}

/// Advance the scenario clock and fire every script command whose timestamp
/// has been reached. Runs before input intake so commands land this tick.
fn drive_script(
    time: Res<Time>,
    script: Res<ScenarioScript>,
    actors: Res<ScenarioActors>,
    mut state: ResMut<ScenarioState>,
    mut aim: ResMut<AimPoint>,
    mut ability_inputs: EventWriter<AbilityInput>,
    mut move_inputs: EventWriter<MoveInput>,
) {
    state.elapsed += time.delta_secs();

    while state.next_command < script.commands.len()
        && script.commands[state.next_command].at <= state.elapsed
    {
        let command = &script.commands[state.next_command];
        state.next_command += 1;

        match command.command {
            CommandKind::Aim { x, y } => {
                aim.0 = Vec2::new(x, y);
            }
            CommandKind::MoveTo { x, y } => {
                move_inputs.send(MoveInput {
                    actor: actors.hive,
                    position: Vec2::new(x, y),
                });
            }
            CommandKind::Ability { slot } => {
                ability_inputs.send(AbilityInput {
                    actor: actors.hive,
                    slot,
                });
            }
        }
    }
}

/// End the scenario on timeout or when the Hive dies; build the result and
/// save the combat log.
fn check_scenario_end(
    actors: Res<ScenarioActors>,
    mut state: ResMut<ScenarioState>,
    mut combat_log: ResMut<CombatLog>,
    actor_query: Query<(&ActorLabel, &Health, &Transform)>,
    hives: Query<&Hive>,
    rifts: Query<(), With<Rift>>,
) {
    if state.complete {
        return;
    }

    let hive_dead = actor_query
        .get(actors.hive)
        .map(|(_, health, _)| !health.is_alive())
        .unwrap_or(true);

    if state.elapsed < state.max_duration && !hive_dead {
        return;
    }

    if hive_dead {
        info!("Scenario ended: the Hive died at {:.1}s", state.elapsed);
    } else {
        info!("Scenario complete after {:.1}s", state.elapsed);
    }
    combat_log.log(
        CombatLogEventType::ScenarioEvent,
        format!("Scenario ended at {:.2}s", state.elapsed),
    );

    let report = |entity: Entity| -> ActorReport {
        match actor_query.get(entity) {
            Ok((label, health, transform)) => ActorReport {
                name: label.0.clone(),
                max_health: health.max(),
                final_health: health.current(),
                survived: health.is_alive(),
                final_position: (transform.translation.x, transform.translation.y),
            },
            // Despawned actors report as dead at the origin
            Err(_) => ActorReport {
                name: String::new(),
                max_health: 0.0,
                final_health: 0.0,
                survived: false,
                final_position: (0.0, 0.0),
            },
        }
    };

    let result = ScenarioResult {
        hive: report(actors.hive),
        dummies: actors.dummies.iter().copied().map(report).collect(),
        rifts_alive: rifts.iter().count(),
        rifts_spawned: hives
            .get(actors.hive)
            .map(|hive| hive.rifts_spawned)
            .unwrap_or(0),
        elapsed: state.elapsed,
        random_seed: state.random_seed,
    };

    save_scenario_log(&result, &combat_log, &state);
    state.result = Some(result);
    state.complete = true;
}

fn save_scenario_log(result: &ScenarioResult, combat_log: &CombatLog, state: &ScenarioState) {
    let mut header = String::new();
    header.push_str(&format!("Scenario run ({:.2}s)\n", result.elapsed));
    if let Some(seed) = result.random_seed {
        header.push_str(&format!("Random seed: {}\n", seed));
    }
    header.push_str(&format!(
        "{}: {:.1}/{:.1} health, {} rifts spawned, {} alive at end\n",
        result.hive.name,
        result.hive.final_health,
        result.hive.max_health,
        result.rifts_spawned,
        result.rifts_alive
    ));
    for dummy in &result.dummies {
        header.push_str(&format!(
            "{}: {:.1}/{:.1} health, {}\n",
            dummy.name,
            dummy.final_health,
            dummy.max_health,
            if dummy.survived { "survived" } else { "died" }
        ));
    }

    match combat_log.save_to_file(header.trim_end(), state.output_path.as_deref()) {
        Ok(filename) => println!("Scenario complete. Log saved to: {}", filename),
        Err(e) => eprintln!("Failed to save combat log: {}", e),
    }
}

/// Run a scenario to completion and return its result.
///
/// Time advances in fixed 60 Hz steps driven manually, so a seeded scenario
/// is fully reproducible.
pub fn run_scenario(config: ScenarioConfig) -> Result<ScenarioResult, String> {
    config.validate()?;

    // Hard frame cap in case the end condition never fires
    let max_frames = (config.max_duration_secs as f64 * 60.0) as u64 + 120;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(TransformPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
        .add_plugins(HiveConfigPlugin)
        .add_plugins(SimulationPlugin)
        .add_plugins(ScenarioPlugin { config });

    for _ in 0..max_frames {
        app.update();
        if app.world().resource::<ScenarioState>().complete {
            break;
        }
    }

    let mut state = app.world_mut().resource_mut::<ScenarioState>();
    state
        .result
        .take()
        .ok_or_else(|| "Scenario ended without producing a result".to_string())
}
