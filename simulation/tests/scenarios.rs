use std::time::Duration;

use glam::Vec2;

use corridor_defence_core::{
    AdversaryKind, CellCoord, CombatConfig, CommandError, ConfigError, DefenderKind,
    DefenderSnapshot, EconomyConfig, GameConfig, Tile, WavePhase,
};
use corridor_defence_simulation::{Simulation, SimulationHooks};

const FRAME: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct RecordingHooks {
    built: Vec<DefenderSnapshot>,
    build_failures: Vec<CommandError>,
    kills: Vec<(Vec2, AdversaryKind, bool)>,
    leaks: u32,
    waves_cleared: Vec<(u32, u32)>,
    game_over: Option<u32>,
}

impl SimulationHooks for RecordingHooks {
    fn on_build_success(&mut self, defender: &DefenderSnapshot) {
        self.built.push(*defender);
    }

    fn on_build_failure(&mut self, reason: CommandError) {
        self.build_failures.push(reason);
    }

    fn on_adversary_killed(&mut self, position: Vec2, kind: AdversaryKind, boss: bool) {
        self.kills.push((position, kind, boss));
    }

    fn on_adversary_leaked(&mut self) {
        self.leaks += 1;
    }

    fn on_wave_cleared(&mut self, wave: u32, bonus: u32) {
        self.waves_cleared.push((wave, bonus));
    }

    fn on_game_over(&mut self, final_wave: u32) {
        self.game_over = Some(final_wave);
    }
}

fn recording(config: GameConfig) -> Simulation<RecordingHooks> {
    Simulation::with_hooks(config, RecordingHooks::default()).expect("valid config")
}

fn first_empty_cell(simulation: &Simulation<RecordingHooks>) -> CellCoord {
    simulation
        .grid()
        .iter()
        .find(|(_, tile)| *tile == Tile::Empty)
        .map(|(cell, _)| cell)
        .expect("grid has an empty tile")
}

#[test]
fn out_of_range_tuning_is_rejected_at_construction() {
    let config = GameConfig {
        combat: CombatConfig {
            contact_radius: 0.0,
            ..CombatConfig::default()
        },
        ..GameConfig::default()
    };
    assert!(matches!(
        Simulation::new(config),
        Err(ConfigError::NotPositive {
            field: "combat.contact_radius"
        })
    ));
}

#[test]
fn building_on_empty_tile_charges_and_occupies() {
    let mut simulation = recording(GameConfig::default());
    assert_eq!(simulation.grid().columns(), 12);
    assert_eq!(simulation.grid().rows(), 10);
    assert_eq!(simulation.snapshot().money, 250);

    let cell = first_empty_cell(&simulation);
    let _ = simulation.select_build_type(DefenderKind::Basic);
    let defender = simulation
        .attempt_build(cell.column(), cell.row())
        .expect("build succeeds");

    assert_eq!(simulation.snapshot().money, 200);
    assert_eq!(simulation.grid().tile(cell), Some(Tile::Occupied));
    assert_eq!(simulation.hooks().built.len(), 1);
    assert_eq!(simulation.hooks().built[0].id, defender);

    assert_eq!(
        simulation.attempt_build(cell.column(), cell.row()),
        Err(CommandError::TileNotEmpty {
            tile: Tile::Occupied
        })
    );
    assert_eq!(simulation.snapshot().money, 200);
    assert_eq!(simulation.snapshot().defenders.len(), 1);
    assert_eq!(simulation.hooks().build_failures.len(), 1);
}

#[test]
fn building_requires_selection_funds_and_free_tile() {
    let mut simulation = recording(GameConfig::default());
    let spawn = simulation.grid().spawn();
    let cell = first_empty_cell(&simulation);

    assert_eq!(
        simulation.attempt_build(cell.column(), cell.row()),
        Err(CommandError::NoBuildTypeSelected)
    );

    let _ = simulation.select_build_type(DefenderKind::Basic);
    assert_eq!(
        simulation.attempt_build(spawn.column(), spawn.row()),
        Err(CommandError::TileNotEmpty { tile: Tile::Spawn })
    );
    assert_eq!(
        simulation.attempt_build(40, 40),
        Err(CommandError::OutOfBounds)
    );

    let _ = simulation.select_build_type(DefenderKind::Splash);
    assert_eq!(
        simulation.attempt_build(cell.column(), cell.row()),
        Err(CommandError::InsufficientFunds {
            required: 400,
            available: 250,
        })
    );
    assert_eq!(simulation.snapshot().money, 250);
    assert_eq!(simulation.grid().tile(cell), Some(Tile::Empty));
}

#[test]
fn upgrade_and_sell_follow_cumulative_spend() {
    let mut simulation = recording(GameConfig::default());
    let cell = first_empty_cell(&simulation);
    let _ = simulation.select_build_type(DefenderKind::Basic);
    let _ = simulation
        .attempt_build(cell.column(), cell.row())
        .expect("build succeeds");

    let selected = simulation
        .select_defender_at(cell.column(), cell.row())
        .expect("defender selected");
    assert_eq!(selected.upgrade_cost, 25);
    assert_eq!(simulation.selection().build_kind, None);

    assert_eq!(simulation.upgrade_selected(), Ok(2));
    assert_eq!(simulation.snapshot().money, 175);

    let upgraded = simulation.snapshot().defenders.into_vec()[0];
    assert_eq!(upgraded.total_spent, 75);
    assert_eq!(upgraded.sell_value, 52);

    assert_eq!(simulation.sell_selected(), Ok(52));
    assert_eq!(simulation.snapshot().money, 227);
    assert_eq!(simulation.grid().tile(cell), Some(Tile::Empty));
    assert!(simulation.snapshot().defenders.is_empty());

    assert_eq!(simulation.sell_selected(), Err(CommandError::NoSelection));
    assert_eq!(simulation.snapshot().money, 227);
}

#[test]
fn selecting_empty_tile_selects_nothing() {
    let mut simulation = recording(GameConfig::default());
    let cell = first_empty_cell(&simulation);
    assert!(simulation.select_defender_at(cell.column(), cell.row()).is_none());
    assert_eq!(simulation.upgrade_selected(), Err(CommandError::NoSelection));
}

#[test]
fn first_wave_clears_with_bonus_after_every_spawn_is_gone() {
    let mut simulation = recording(GameConfig::default());
    let mut spawned = 0;
    let mut seen = std::collections::BTreeSet::new();

    simulation.update(FRAME);
    assert_eq!(simulation.snapshot().remaining_spawns, 6);

    for _ in 0..4_000 {
        simulation.update(FRAME);
        for adversary in simulation.snapshot().adversaries.iter() {
            if seen.insert(adversary.id) {
                spawned += 1;
            }
        }
        if !simulation.hooks().waves_cleared.is_empty() {
            break;
        }
    }

    assert_eq!(spawned, 6);
    assert_eq!(simulation.hooks().waves_cleared, vec![(1, 60)]);
    assert_eq!(simulation.hooks().leaks, 6);

    let snapshot = simulation.snapshot();
    assert_eq!(snapshot.wave, 2);
    assert_eq!(snapshot.lives, 14);
    assert_eq!(snapshot.money, 310);
    assert_eq!(snapshot.remaining_spawns, 0);
    assert_eq!(snapshot.phase, WavePhase::WaveCleared);

    simulation.update(FRAME);
    assert_eq!(simulation.snapshot().phase, WavePhase::Intermission);
}

#[test]
fn losing_last_life_freezes_the_run_until_restart() {
    let config = GameConfig {
        economy: EconomyConfig {
            initial_money: 250,
            initial_lives: 2,
        },
        ..GameConfig::default()
    };
    let mut simulation = recording(config);
    for _ in 0..4_000 {
        simulation.update(FRAME);
        if simulation.is_game_over() {
            break;
        }
    }

    assert_eq!(simulation.hooks().game_over, Some(1));
    let frozen = simulation.snapshot();
    assert!(frozen.game_over);
    assert_eq!(frozen.lives, 0);
    assert_eq!(frozen.phase, WavePhase::GameOver);

    simulation.update(FRAME);
    assert_eq!(simulation.snapshot(), frozen);

    let _ = simulation.select_build_type(DefenderKind::Basic);
    assert_eq!(simulation.attempt_build(0, 0), Err(CommandError::GameOver));
    assert_eq!(simulation.toggle_speed(), 1);

    simulation.restart();
    let restarted = simulation.snapshot();
    assert!(!restarted.game_over);
    assert_eq!(restarted.lives, 2);
    assert_eq!(restarted.money, 250);
    assert_eq!(restarted.wave, 1);
    assert!(restarted.adversaries.is_empty());
    assert_eq!(simulation.selection().build_kind, None);

    simulation.update(FRAME);
    assert_eq!(simulation.snapshot().phase, WavePhase::Spawning);
}

#[test]
fn speed_toggle_doubles_progress() {
    let mut normal = Simulation::new(GameConfig::default()).expect("valid config");
    let mut fast = Simulation::new(GameConfig::default()).expect("valid config");
    assert_eq!(fast.toggle_speed(), 2);

    for _ in 0..60 {
        normal.update(FRAME);
    }
    for _ in 0..30 {
        fast.update(FRAME);
    }
    // Both runs have simulated the same three seconds, so the first spawn matches.
    assert_eq!(normal.snapshot().adversaries.len(), 1);
    assert_eq!(fast.snapshot().adversaries.len(), 1);

    assert_eq!(fast.toggle_speed(), 1);
}

#[test]
fn identical_inputs_replay_identically() {
    let run = || {
        let mut simulation = Simulation::new(GameConfig::default()).expect("valid config");
        let cell = simulation
            .grid()
            .iter()
            .find(|(cell, tile)| {
                *tile == Tile::Empty
                    && simulation
                        .grid()
                        .corridor()
                        .iter()
                        .any(|corridor| corridor.manhattan_distance(*cell) == 1)
            })
            .map(|(cell, _)| cell)
            .expect("a tile borders the corridor");
        let _ = simulation.select_build_type(DefenderKind::Rapid);
        let _ = simulation.attempt_build(cell.column(), cell.row());

        let mut frames = Vec::new();
        for _ in 0..600 {
            simulation.update(FRAME);
            frames.push(simulation.snapshot());
        }
        frames
    };

    assert_eq!(run(), run());
}

#[test]
fn defenders_beside_the_corridor_earn_bounties() {
    let mut simulation = recording(GameConfig::default());
    let corridor = simulation.grid().corridor().to_vec();
    let cell = simulation
        .grid()
        .iter()
        .find(|(cell, tile)| {
            *tile == Tile::Empty
                && corridor
                    .iter()
                    .any(|corridor| corridor.manhattan_distance(*cell) == 1)
        })
        .map(|(cell, _)| cell)
        .expect("a tile borders the corridor");
    let _ = simulation.select_build_type(DefenderKind::Basic);
    let _ = simulation
        .attempt_build(cell.column(), cell.row())
        .expect("build succeeds");

    for _ in 0..4_000 {
        simulation.update(FRAME);
        if !simulation.hooks().waves_cleared.is_empty() {
            break;
        }
    }

    let hooks = simulation.hooks();
    assert!(!hooks.kills.is_empty(), "a basic defender beside the corridor scores kills");
    assert_eq!(hooks.kills.len() as u32 + hooks.leaks, 6);
    assert!(hooks
        .kills
        .iter()
        .all(|(_, kind, boss)| *kind == AdversaryKind::Normal && !boss));
}
