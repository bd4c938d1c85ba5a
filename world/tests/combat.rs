use std::time::Duration;

use corridor_defence_core::{
    AdversaryId, AdversaryKind, CellCoord, Command, CommandError, DefenderId, DefenderKind,
    EconomyConfig, Event, GameConfig, GridConfig,
};
use corridor_defence_world::{apply, query, World};

const TICK: Duration = Duration::from_millis(50);

/// World with a straight corridor along row 5, spawn at (0, 5).
fn straight_world() -> World {
    funded_world(250)
}

fn funded_world(initial_money: u32) -> World {
    World::with_config(GameConfig {
        grid: GridConfig {
            max_path_attempts: 0,
            ..GridConfig::default()
        },
        economy: EconomyConfig {
            initial_money,
            initial_lives: 20,
        },
        ..GameConfig::default()
    })
}

fn place(world: &mut World, kind: DefenderKind, cell: CellCoord) -> DefenderId {
    let mut events = Vec::new();
    apply(world, Command::PlaceDefender { kind, cell }, &mut events);
    match events.as_slice() {
        [Event::DefenderPlaced { defender, .. }] => *defender,
        other => panic!("unexpected placement events: {other:?}"),
    }
}

fn spawn(world: &mut World, kind: AdversaryKind) -> AdversaryId {
    let mut events = Vec::new();
    apply(world, Command::SpawnAdversary { kind, boss: false }, &mut events);
    match events.as_slice() {
        [Event::AdversarySpawned { adversary, .. }] => *adversary,
        other => panic!("unexpected spawn events: {other:?}"),
    }
}

fn fly_until_resolved(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..40 {
        apply(world, Command::AdvanceProjectiles { dt: TICK }, &mut events);
        if query::projectile_view(world).is_empty() {
            break;
        }
    }
    events
}

#[test]
fn two_basic_hits_destroy_a_first_wave_adversary() {
    let mut world = straight_world();
    let defender = place(&mut world, DefenderKind::Basic, CellCoord::new(0, 4));
    let target = spawn(&mut world, AdversaryKind::Normal);
    assert_eq!(query::economy(&world).money(), 200);

    let mut events = Vec::new();
    apply(&mut world, Command::FireProjectile { defender, target }, &mut events);
    assert_eq!(events, vec![Event::ProjectileFired { defender, target }]);

    let events = fly_until_resolved(&mut world);
    assert!(events.contains(&Event::ProjectileHit {
        target,
        damage: 15.0
    }));
    let hp = query::adversary_view(&world).get(target).map(|a| a.hp);
    assert_eq!(hp, Some(15.0));

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::AdvanceDefenders {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
    apply(&mut world, Command::FireProjectile { defender, target }, &mut events);
    let events = fly_until_resolved(&mut world);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::AdversaryKilled { adversary, bounty: 11, .. } if *adversary == target
    )));
    assert_eq!(query::adversary_count(&world), 0);
    assert_eq!(query::economy(&world).money(), 211);
}

#[test]
fn cooling_defender_does_not_fire() {
    let mut world = straight_world();
    let defender = place(&mut world, DefenderKind::Basic, CellCoord::new(0, 4));
    let target = spawn(&mut world, AdversaryKind::Normal);

    let mut events = Vec::new();
    apply(&mut world, Command::FireProjectile { defender, target }, &mut events);
    apply(&mut world, Command::FireProjectile { defender, target }, &mut events);

    assert_eq!(events.len(), 1);
    assert_eq!(query::projectile_view(&world).len(), 1);
}

#[test]
fn projectile_fizzles_when_target_dies_first() {
    let mut world = straight_world();
    let sniper = place(&mut world, DefenderKind::Sniper, CellCoord::new(0, 4));
    let basic = place(&mut world, DefenderKind::Basic, CellCoord::new(2, 4));
    let target = spawn(&mut world, AdversaryKind::Normal);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::FireProjectile {
            defender: sniper,
            target,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::FireProjectile {
            defender: basic,
            target,
        },
        &mut events,
    );
    assert_eq!(events.len(), 2);

    let events = fly_until_resolved(&mut world);
    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileHit { .. }))
        .count();
    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::AdversaryKilled { .. }))
        .count();

    assert_eq!(hits, 1);
    assert_eq!(kills, 1);
    assert!(events.contains(&Event::ProjectileFizzled { target }));
    assert_eq!(query::economy(&world).money(), 250 - 150 - 50 + 11);
}

#[test]
fn only_frost_hits_slow_the_target() {
    let mut world = straight_world();
    let basic = place(&mut world, DefenderKind::Basic, CellCoord::new(0, 4));
    let target = spawn(&mut world, AdversaryKind::Normal);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::FireProjectile {
            defender: basic,
            target,
        },
        &mut events,
    );
    let _ = fly_until_resolved(&mut world);
    let slowed = query::adversary_view(&world).get(target).map(|a| a.slowed);
    assert_eq!(slowed, Some(false));

    let mut world = funded_world(300);
    let frost = place(&mut world, DefenderKind::Frost, CellCoord::new(0, 4));
    let target = spawn(&mut world, AdversaryKind::Normal);
    apply(
        &mut world,
        Command::FireProjectile {
            defender: frost,
            target,
        },
        &mut events,
    );
    let _ = fly_until_resolved(&mut world);
    let slowed = query::adversary_view(&world).get(target).map(|a| a.slowed);
    assert_eq!(slowed, Some(true));
}

fn is_slowed(world: &World, target: AdversaryId) -> bool {
    query::adversary_view(world)
        .get(target)
        .map(|adversary| adversary.slowed)
        .expect("target alive")
}

fn walk(world: &mut World, ticks: u32) {
    let mut events = Vec::new();
    for _ in 0..ticks {
        apply(world, Command::AdvanceAdversaries { dt: TICK }, &mut events);
    }
}

#[test]
fn second_frost_hit_refreshes_the_slow() {
    let mut world = funded_world(1_000);
    let frost = place(&mut world, DefenderKind::Frost, CellCoord::new(0, 4));
    let target = spawn(&mut world, AdversaryKind::Tank);
    let fire = Command::FireProjectile {
        defender: frost,
        target,
    };

    let mut events = Vec::new();
    apply(&mut world, fire.clone(), &mut events);
    let _ = fly_until_resolved(&mut world);
    assert!(is_slowed(&world, target));

    walk(&mut world, 30);
    assert!(is_slowed(&world, target));

    apply(
        &mut world,
        Command::AdvanceDefenders {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
    events.clear();
    apply(&mut world, fire, &mut events);
    assert_eq!(events.len(), 1, "second shot fired: {events:?}");
    let _ = fly_until_resolved(&mut world);

    // The slow lasts two seconds from the second hit, not what was left plus two.
    walk(&mut world, 38);
    assert!(is_slowed(&world, target));
    walk(&mut world, 2);
    assert!(!is_slowed(&world, target));
}

#[test]
fn splash_damages_neighbours_of_the_impact() {
    let mut world = funded_world(1_000);
    let splash = place(&mut world, DefenderKind::Splash, CellCoord::new(0, 4));
    let first = spawn(&mut world, AdversaryKind::Normal);
    let second = spawn(&mut world, AdversaryKind::Normal);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::FireProjectile {
            defender: splash,
            target: first,
        },
        &mut events,
    );
    let events = fly_until_resolved(&mut world);
    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::AdversaryKilled { .. }))
        .count();

    assert_eq!(kills, 2, "both stacked adversaries take the splash: {events:?}");
    assert!(query::adversary_view(&world).get(second).is_none());
}

#[test]
fn leaking_last_life_ends_the_run() {
    let mut world = World::with_config(GameConfig {
        grid: GridConfig {
            columns: 2,
            max_path_attempts: 0,
            ..GridConfig::default()
        },
        economy: EconomyConfig {
            initial_money: 250,
            initial_lives: 1,
        },
        ..GameConfig::default()
    });
    let _ = spawn(&mut world, AdversaryKind::Fast);

    let mut events = Vec::new();
    for _ in 0..200 {
        apply(&mut world, Command::AdvanceAdversaries { dt: TICK }, &mut events);
        if query::economy(&world).is_game_over() {
            break;
        }
    }

    assert!(events.iter().any(|event| matches!(event, Event::AdversaryLeaked { lives: 0, .. })));
    assert!(events.contains(&Event::GameOver { final_wave: 1 }));

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::PlaceDefender {
            kind: DefenderKind::Basic,
            cell: CellCoord::new(0, 0),
        },
        &mut events,
    );
    assert!(matches!(
        events.as_slice(),
        [Event::DefenderPlacementRejected {
            reason: CommandError::GameOver,
            ..
        }]
    ));
}
