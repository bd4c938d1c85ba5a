#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-stepped orchestrator for Corridor Defence.
//!
//! [`Simulation`] owns the authoritative world together with every pure
//! system, drives them in a fixed order on each [`Simulation::update`], and
//! exposes the command and query surface a presentation layer talks to.

mod hooks;

use std::time::Duration;

use log::{debug, info};

use corridor_defence_core::{
    AdversaryView, CellCoord, Command, CommandError, ConfigError, DefenderId, DefenderKind,
    DefenderSnapshot, DefenderTarget, DefenderView, Event, GameConfig, ProjectileView, WavePhase,
};
use corridor_defence_system_builder::{Builder, Selection};
use corridor_defence_system_defender_combat::fire_commands;
use corridor_defence_system_defender_targeting::{retarget_commands, DefenderTargeting};
use corridor_defence_system_spawning::{Spawning, WaveProgress};
use corridor_defence_world::{self as world, query, Grid, World};

pub use hooks::{NoopHooks, SimulationHooks};

/// Read-only picture of the run handed to presentation collaborators each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Money available.
    pub money: u32,
    /// Lives left.
    pub lives: u32,
    /// One-based number of the current wave.
    pub wave: u32,
    /// Phase of the wave scheduler.
    pub phase: WavePhase,
    /// Adversaries the scheduler has yet to spawn this wave.
    pub remaining_spawns: u32,
    /// Multiplier currently applied to the frame delta.
    pub speed: u32,
    /// Indicates whether the run ended.
    pub game_over: bool,
    /// Every live adversary in entity-table order.
    pub adversaries: AdversaryView,
    /// Every defender ordered by identifier.
    pub defenders: DefenderView,
    /// Every projectile in flight.
    pub projectiles: ProjectileView,
}

/// Orchestrator that owns a run and advances it one frame at a time.
#[derive(Debug)]
pub struct Simulation<H = NoopHooks>
where
    H: SimulationHooks,
{
    world: World,
    spawning: Spawning,
    targeting: DefenderTargeting,
    builder: Builder,
    hooks: H,
    fast_multiplier: u32,
    speed: u32,
    pending_events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<DefenderTarget>,
}

impl Simulation<NoopHooks> {
    /// Creates a simulation without presentation hooks.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_hooks(config, NoopHooks)
    }
}

impl<H> Simulation<H>
where
    H: SimulationHooks,
{
    /// Creates a simulation that reports to the provided hooks.
    ///
    /// The configuration is validated first; out-of-range tuning is rejected
    /// before any state is generated.
    pub fn with_hooks(config: GameConfig, hooks: H) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawning = Spawning::new(config.waves.clone());
        let fast_multiplier = config.combat.fast_speed_multiplier;
        Ok(Self {
            world: World::with_config(config),
            spawning,
            targeting: DefenderTargeting::new(),
            builder: Builder::new(),
            hooks,
            fast_multiplier,
            speed: 1,
            pending_events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
        })
    }

    /// Hooks receiving presentation callbacks.
    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Mutable access to the hooks receiving presentation callbacks.
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Advances the run by `dt` scaled by the current speed multiplier.
    ///
    /// Phases run in order: wave scheduling, adversary motion, defender
    /// cooldowns, targeting, firing, projectile resolution. Losing the last life
    /// skips the remainder of the tick; once the run is over this is a no-op.
    pub fn update(&mut self, dt: Duration) {
        if self.is_game_over() {
            return;
        }

        let dt = dt.saturating_mul(self.speed);
        let economy = query::economy(&self.world);
        let progress = WaveProgress {
            wave: economy.wave(),
            live_adversaries: query::adversary_count(&self.world),
        };

        let events = std::mem::take(&mut self.pending_events);
        self.spawning
            .handle(&events, dt, progress, &mut self.commands);
        self.flush_commands();

        let _ = self.execute(Command::AdvanceAdversaries { dt });
        if self.is_game_over() {
            return;
        }

        let _ = self.execute(Command::AdvanceDefenders { dt });

        let defenders = query::defender_view(&self.world);
        let adversaries = query::adversary_view(&self.world);
        self.targeting
            .handle(&defenders, &adversaries, &mut self.targets);
        retarget_commands(&defenders, &self.targets, &mut self.commands);
        self.flush_commands();

        fire_commands(&defenders, &self.targets, &mut self.commands);
        self.flush_commands();

        let _ = self.execute(Command::AdvanceProjectiles { dt });
    }

    /// Selects the defender kind to build, toggling it off when already selected.
    pub fn select_build_type(&mut self, kind: DefenderKind) -> Option<DefenderKind> {
        self.builder.select_build_type(kind)
    }

    /// Clears the build type and the selected defender.
    pub fn deselect(&mut self) {
        self.builder.deselect();
    }

    /// Builds the selected defender kind on the provided tile.
    pub fn attempt_build(&mut self, column: u32, row: u32) -> Result<DefenderId, CommandError> {
        self.ensure_running()?;
        let command = self
            .builder
            .build_command(CellCoord::new(column, row))?;

        let start = self.execute(command);
        self.pending_events[start..]
            .iter()
            .find_map(|event| match event {
                Event::DefenderPlaced { defender, .. } => Some(Ok(*defender)),
                Event::DefenderPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(CommandError::MissingDefender))
    }

    /// Selects the defender standing on the provided tile, if any.
    pub fn select_defender_at(&mut self, column: u32, row: u32) -> Option<DefenderSnapshot> {
        if self.is_game_over() {
            return None;
        }
        let world = &self.world;
        let selected = self
            .builder
            .select_defender_at(CellCoord::new(column, row), |cell| {
                query::defender_at(world, cell).map(|defender| defender.id)
            })?;
        query::defender_view(world)
            .into_vec()
            .into_iter()
            .find(|defender| defender.id == selected)
    }

    /// Upgrades the selected defender, returning its new level.
    pub fn upgrade_selected(&mut self) -> Result<u32, CommandError> {
        self.ensure_running()?;
        let command = self.builder.upgrade_command()?;

        let start = self.execute(command);
        self.pending_events[start..]
            .iter()
            .find_map(|event| match event {
                Event::DefenderUpgraded { level, .. } => Some(Ok(*level)),
                Event::DefenderUpgradeRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(CommandError::MissingDefender))
    }

    /// Sells the selected defender, returning the refund.
    pub fn sell_selected(&mut self) -> Result<u32, CommandError> {
        self.ensure_running()?;
        let command = self.builder.sell_command()?;

        let start = self.execute(command);
        self.pending_events[start..]
            .iter()
            .find_map(|event| match event {
                Event::DefenderSold { refund, .. } => Some(Ok(*refund)),
                Event::DefenderSaleRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(CommandError::MissingDefender))
    }

    /// Switches between normal and fast speed, returning the new multiplier.
    pub fn toggle_speed(&mut self) -> u32 {
        if self.is_game_over() {
            return self.speed;
        }
        self.speed = if self.speed == 1 {
            self.fast_multiplier
        } else {
            1
        };
        debug!("speed multiplier set to {}x", self.speed);
        self.speed
    }

    /// Starts a fresh run on a newly generated corridor.
    pub fn restart(&mut self) {
        info!("restarting run");
        self.speed = 1;
        self.targets.clear();
        let _ = self.execute(Command::ResetRun);
    }

    /// Captures the state presentation collaborators draw from.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let economy = query::economy(&self.world);
        let phase = if economy.is_game_over() {
            WavePhase::GameOver
        } else {
            self.spawning.phase()
        };

        FrameSnapshot {
            money: economy.money(),
            lives: economy.lives(),
            wave: economy.wave(),
            phase,
            remaining_spawns: self.spawning.remaining(),
            speed: self.speed,
            game_over: economy.is_game_over(),
            adversaries: query::adversary_view(&self.world),
            defenders: query::defender_view(&self.world),
            projectiles: query::projectile_view(&self.world),
        }
    }

    /// Tile grid and waypoints of the current run.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        query::grid(&self.world)
    }

    /// Current player selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.builder.selection()
    }

    /// Reports whether the run ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::economy(&self.world).is_game_over()
    }

    fn ensure_running(&self) -> Result<(), CommandError> {
        if self.is_game_over() {
            Err(CommandError::GameOver)
        } else {
            Ok(())
        }
    }

    fn flush_commands(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        for command in commands {
            let _ = self.execute(command);
        }
    }

    /// Applies a command and dispatches the resulting events, returning the
    /// index of the first event it produced within the pending buffer.
    fn execute(&mut self, command: Command) -> usize {
        let start = self.pending_events.len();
        world::apply(&mut self.world, command, &mut self.pending_events);
        let produced = &self.pending_events[start..];
        self.builder.handle(produced);

        for event in produced {
            match event {
                Event::DefenderPlaced { cell, .. } => {
                    if let Some(defender) = query::defender_at(&self.world, *cell) {
                        self.hooks.on_build_success(&defender);
                    }
                }
                Event::DefenderPlacementRejected { reason, .. } => {
                    self.hooks.on_build_failure(*reason);
                }
                Event::AdversaryKilled {
                    position,
                    kind,
                    boss,
                    ..
                } => {
                    self.hooks.on_adversary_killed(*position, *kind, *boss);
                }
                Event::AdversaryLeaked { .. } => self.hooks.on_adversary_leaked(),
                Event::WaveCleared { wave, bonus } => self.hooks.on_wave_cleared(*wave, *bonus),
                Event::GameOver { final_wave } => self.hooks.on_game_over(*final_wave),
                _ => {}
            }
        }

        start
    }
}
