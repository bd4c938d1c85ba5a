#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Corridor Defence.

mod adversaries;
mod defenders;
mod entities;
mod grid;
mod projectiles;

use std::time::Duration;

use glam::Vec2;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use corridor_defence_core::{
    AdversaryId, AdversaryKind, CellCoord, Command, CommandError, DefenderId, DefenderKind,
    Event, GameConfig, ProjectileEffect, Tile,
};

use adversaries::Adversary;
use defenders::DefenderRegistry;
use entities::EntityTable;
use projectiles::{Flight, Projectile};

pub use grid::Grid;

/// Money, lives, and wave counter of the active run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Economy {
    money: u32,
    lives: u32,
    wave: u32,
}

impl Economy {
    fn new(config: &GameConfig) -> Self {
        Self {
            money: config.economy.initial_money,
            lives: config.economy.initial_lives,
            wave: 1,
        }
    }

    /// Money available for construction and upgrades.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Lives left before the run ends.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// One-based number of the current wave.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Reports whether the run ended.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    fn charge(&mut self, cost: u32) -> Result<(), CommandError> {
        match self.money.checked_sub(cost) {
            Some(remaining) => {
                self.money = remaining;
                Ok(())
            }
            None => Err(CommandError::InsufficientFunds {
                required: cost,
                available: self.money,
            }),
        }
    }

    fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }
}

/// Represents the authoritative Corridor Defence world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    rng: ChaCha8Rng,
    grid: Grid,
    waypoint_positions: Vec<Vec2>,
    adversaries: EntityTable<Adversary>,
    defenders: DefenderRegistry,
    projectiles: Vec<Projectile>,
    economy: Economy,
}

impl World {
    /// Creates a world using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Creates a world whose corridor is synthesized from the configured seed.
    ///
    /// The configuration is expected to pass [`GameConfig::validate`].
    #[must_use]
    pub fn with_config(config: GameConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.grid.seed);
        let grid = Grid::generate(&config.grid, &mut rng);
        let waypoint_positions = grid.waypoint_positions();
        info!(
            "world created: {}x{} grid, corridor of {} tiles",
            grid.columns(),
            grid.rows(),
            grid.corridor().len()
        );

        Self {
            economy: Economy::new(&config),
            config,
            rng,
            grid,
            waypoint_positions,
            adversaries: EntityTable::new(),
            defenders: DefenderRegistry::new(),
            projectiles: Vec::new(),
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.grid = Grid::generate(&self.config.grid, &mut self.rng);
        self.waypoint_positions = self.grid.waypoint_positions();
        self.adversaries.clear();
        self.defenders.clear();
        self.projectiles.clear();
        self.economy = Economy::new(&self.config);

        info!(
            "run reset: corridor from {:?} to {:?} ({} waypoints)",
            self.grid.spawn(),
            self.grid.base(),
            self.grid.waypoints().len()
        );
        out_events.push(Event::RunReset);
        out_events.push(Event::CorridorGenerated {
            spawn: self.grid.spawn(),
            base: self.grid.base(),
            waypoints: self.grid.waypoints().len(),
            fallback: self.grid.used_fallback(),
        });
    }

    fn spawn_adversary(&mut self, kind: AdversaryKind, boss: bool, out_events: &mut Vec<Event>) {
        let Some(origin) = self.waypoint_positions.first().copied() else {
            return;
        };
        let stats = kind.stats(self.economy.wave, &self.config.waves, boss);
        let adversary = self
            .adversaries
            .insert(Adversary::spawn(kind, boss, stats, origin));
        debug!(
            "spawned {kind:?}{} {adversary:?} with {} hp",
            if boss { " boss" } else { "" },
            stats.max_hp
        );
        out_events.push(Event::AdversarySpawned {
            adversary,
            kind,
            boss,
        });
    }

    fn advance_adversaries(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut leaked = Vec::new();
        for (id, adversary) in self.adversaries.iter_mut() {
            adversary.advance(dt, &self.waypoint_positions, &self.config.combat);
            if adversary.reached_end {
                leaked.push(id);
            }
        }

        for id in leaked {
            let Some(adversary) = self.adversaries.remove(id) else {
                continue;
            };
            let was_alive = !self.economy.is_game_over();
            self.economy.lives = self.economy.lives.saturating_sub(1);
            out_events.push(Event::AdversaryLeaked {
                adversary: id,
                kind: adversary.kind,
                lives: self.economy.lives,
            });

            if was_alive && self.economy.is_game_over() {
                info!("game over during wave {}", self.economy.wave);
                out_events.push(Event::GameOver {
                    final_wave: self.economy.wave,
                });
            }
        }
    }

    fn fire_projectile(
        &mut self,
        defender: DefenderId,
        target: AdversaryId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(state) = self.defenders.get_mut(defender) else {
            debug!("fire ignored: {defender:?} no longer exists");
            return;
        };
        let Some(adversary) = self
            .adversaries
            .get(target)
            .filter(|adversary| adversary.is_alive())
        else {
            debug!("fire ignored: {target:?} is stale");
            return;
        };
        if !state.ready() || !state.in_range(adversary.position) {
            return;
        }

        state.cooldown = state.fire_interval;
        state.target = Some(target);
        self.projectiles.push(Projectile::new(
            state.kind,
            state.position,
            target,
            state.damage,
            self.config.combat.projectile_speed,
        ));
        out_events.push(Event::ProjectileFired { defender, target });
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let contact_radius = self.config.combat.contact_radius;

        for index in 0..self.projectiles.len() {
            let target = self.projectiles[index].target;
            let target_position = self
                .adversaries
                .get(target)
                .filter(|adversary| adversary.is_alive())
                .map(|adversary| adversary.position);

            match self.projectiles[index].advance(dt, target_position, contact_radius) {
                Flight::InFlight => {}
                Flight::Fizzled => {
                    debug!("projectile toward {target:?} fizzled");
                    out_events.push(Event::ProjectileFizzled { target });
                }
                Flight::Hit { impact } => {
                    let projectile = &self.projectiles[index];
                    let (kind, damage) = (projectile.kind, projectile.damage);
                    self.resolve_hit(kind, target, damage, impact);
                    out_events.push(Event::ProjectileHit { target, damage });
                }
            }
        }

        self.projectiles.retain(|projectile| !projectile.resolved);
        self.reap_destroyed(out_events);
    }

    fn resolve_hit(&mut self, kind: DefenderKind, target: AdversaryId, damage: f32, impact: Vec2) {
        match kind.effect() {
            ProjectileEffect::None => {
                if let Some(adversary) = self.adversaries.get_mut(target) {
                    adversary.take_damage(damage);
                }
            }
            ProjectileEffect::Slow => {
                let duration = self.config.combat.slow_duration();
                if let Some(adversary) = self.adversaries.get_mut(target) {
                    adversary.take_damage(damage);
                    adversary.apply_slow(duration);
                }
            }
            ProjectileEffect::Splash => {
                let radius = self.config.combat.splash_radius;
                for (_, adversary) in self.adversaries.iter_mut() {
                    if adversary.is_alive() && adversary.position.distance(impact) <= radius {
                        adversary.take_damage(damage);
                    }
                }
            }
        }
    }

    fn reap_destroyed(&mut self, out_events: &mut Vec<Event>) {
        let destroyed: Vec<AdversaryId> = self
            .adversaries
            .iter()
            .filter(|(_, adversary)| !adversary.is_alive())
            .map(|(id, _)| id)
            .collect();

        for id in destroyed {
            if let Some(adversary) = self.adversaries.remove(id) {
                self.economy.credit(adversary.bounty);
                out_events.push(Event::AdversaryKilled {
                    adversary: id,
                    kind: adversary.kind,
                    boss: adversary.boss,
                    position: adversary.position,
                    bounty: adversary.bounty,
                });
            }
        }
    }

    fn place_defender(
        &mut self,
        kind: DefenderKind,
        cell: CellCoord,
    ) -> Result<(DefenderId, u32), CommandError> {
        if self.economy.is_game_over() {
            return Err(CommandError::GameOver);
        }
        let tile = self.grid.tile(cell).ok_or(CommandError::OutOfBounds)?;
        if tile != Tile::Empty {
            return Err(CommandError::TileNotEmpty { tile });
        }
        let cost = kind.cost();
        self.economy.charge(cost)?;

        let defender = self
            .defenders
            .insert(kind, cell, self.grid.tile_length());
        let _ = self.grid.set_tile(cell, Tile::Occupied);
        Ok((defender, cost))
    }

    fn upgrade_defender(&mut self, defender: DefenderId) -> Result<(u32, u32), CommandError> {
        if self.economy.is_game_over() {
            return Err(CommandError::GameOver);
        }
        let state = self
            .defenders
            .get_mut(defender)
            .ok_or(CommandError::MissingDefender)?;
        let cost = self.config.upgrades.upgrade_cost(state.total_spent);
        self.economy.charge(cost)?;
        state.upgrade(cost, &self.config.upgrades);
        Ok((state.level, cost))
    }

    fn sell_defender(&mut self, defender: DefenderId) -> Result<(CellCoord, u32), CommandError> {
        if self.economy.is_game_over() {
            return Err(CommandError::GameOver);
        }
        let state = self
            .defenders
            .remove(defender)
            .ok_or(CommandError::MissingDefender)?;
        let refund = self.config.upgrades.sell_value(state.total_spent);
        let _ = self.grid.set_tile(state.cell, Tile::Empty);
        self.economy.credit(refund);
        Ok((state.cell, refund))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once lives reach zero every command except [`Command::ResetRun`] is ignored,
/// and player commands are answered with a rejection event.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let game_over = world.economy.is_game_over();

    match command {
        Command::ResetRun => world.reset(out_events),
        Command::StartWave { spawn_budget } => {
            if game_over {
                return;
            }
            info!(
                "wave {} started with {spawn_budget} adversaries",
                world.economy.wave
            );
            out_events.push(Event::WaveStarted {
                wave: world.economy.wave,
                spawn_budget,
            });
        }
        Command::SpawnAdversary { kind, boss } => {
            if !game_over {
                world.spawn_adversary(kind, boss, out_events);
            }
        }
        Command::AdvanceAdversaries { dt } => {
            if !game_over {
                world.advance_adversaries(dt, out_events);
            }
        }
        Command::AdvanceDefenders { dt } => {
            if game_over {
                return;
            }
            for defender in world.defenders.iter_mut() {
                defender.cool_down(dt);
            }
        }
        Command::AssignTarget { defender, target } => {
            if let Some(state) = world.defenders.get_mut(defender) {
                state.target = target;
            }
        }
        Command::FireProjectile { defender, target } => {
            if !game_over {
                world.fire_projectile(defender, target, out_events);
            }
        }
        Command::AdvanceProjectiles { dt } => {
            if !game_over {
                world.advance_projectiles(dt, out_events);
            }
        }
        Command::PlaceDefender { kind, cell } => match world.place_defender(kind, cell) {
            Ok((defender, cost)) => {
                debug!("placed {kind:?} {defender:?} at {cell:?} for {cost}");
                out_events.push(Event::DefenderPlaced {
                    defender,
                    kind,
                    cell,
                    cost,
                });
            }
            Err(reason) => {
                debug!("placement of {kind:?} at {cell:?} rejected: {reason}");
                out_events.push(Event::DefenderPlacementRejected { kind, cell, reason });
            }
        },
        Command::UpgradeDefender { defender } => match world.upgrade_defender(defender) {
            Ok((level, cost)) => out_events.push(Event::DefenderUpgraded {
                defender,
                level,
                cost,
            }),
            Err(reason) => {
                debug!("upgrade of {defender:?} rejected: {reason}");
                out_events.push(Event::DefenderUpgradeRejected { defender, reason });
            }
        },
        Command::SellDefender { defender } => match world.sell_defender(defender) {
            Ok((cell, refund)) => out_events.push(Event::DefenderSold {
                defender,
                cell,
                refund,
            }),
            Err(reason) => {
                debug!("sale of {defender:?} rejected: {reason}");
                out_events.push(Event::DefenderSaleRejected { defender, reason });
            }
        },
        Command::CompleteWave { bonus } => {
            if game_over {
                return;
            }
            let wave = world.economy.wave;
            world.economy.credit(bonus);
            world.economy.wave = wave.saturating_add(1);
            info!("wave {wave} cleared, bonus {bonus}");
            out_events.push(Event::WaveCleared { wave, bonus });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Economy, Grid, World};
    use corridor_defence_core::{
        AdversaryView, CellCoord, DefenderSnapshot, DefenderView, ProjectileView,
    };

    /// Tile grid and corridor of the current run.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Money, lives, and wave counter of the current run.
    #[must_use]
    pub fn economy(world: &World) -> Economy {
        world.economy
    }

    /// Captures a read-only view of every live adversary in entity-table order.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        AdversaryView::from_snapshots(
            world
                .adversaries
                .iter()
                .map(|(id, adversary)| adversary.snapshot(id))
                .collect(),
        )
    }

    /// Number of adversaries currently walking the corridor.
    #[must_use]
    pub fn adversary_count(world: &World) -> usize {
        world.adversaries.len()
    }

    /// Captures a read-only view of every defender ordered by identifier.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        DefenderView::from_snapshots(
            world
                .defenders
                .iter()
                .map(|defender| defender.snapshot(&world.config.upgrades))
                .collect(),
        )
    }

    /// Snapshot of the defender occupying the provided tile, if any.
    #[must_use]
    pub fn defender_at(world: &World, cell: CellCoord) -> Option<DefenderSnapshot> {
        world
            .defenders
            .at(cell)
            .map(|defender| defender.snapshot(&world.config.upgrades))
    }

    /// Captures a read-only view of every in-flight projectile.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }
}
