#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Corridor Defence engine.
//!
//! This crate defines the message surface that connects the orchestrator, the
//! authoritative world, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems consume event streams, query immutable views,
//! and respond exclusively with new command batches.

mod config;
mod kinds;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{
    duration_from_secs, CombatConfig, ConfigError, EconomyConfig, GameConfig, GridConfig,
    UpgradeConfig, WaveConfig,
};
pub use kinds::{
    AdversaryKind, AdversaryStats, DefenderKind, DefenderStats, ProjectileEffect,
};

/// Phase of the wave scheduler state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting for the next wave to begin.
    Intermission,
    /// Emitting the current wave's spawn budget.
    Spawning,
    /// The current wave was fully spawned and defeated on this tick.
    WaveCleared,
    /// Lives reached zero; only a restart leaves this phase.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Regenerates the corridor, clears every entity, and restores the starting economy.
    ResetRun,
    /// Announces the start of the current wave.
    StartWave {
        /// Number of adversaries the scheduler will spawn during the wave.
        spawn_budget: u32,
    },
    /// Spawns an adversary of the provided kind at the corridor's spawn tile.
    SpawnAdversary {
        /// Variant rolled by the scheduler.
        kind: AdversaryKind,
        /// Applies the boss multipliers on top of the variant's stats.
        boss: bool,
    },
    /// Moves adversaries along the corridor and reaps those that reached the base.
    AdvanceAdversaries {
        /// Scaled simulation time elapsed on this tick.
        dt: Duration,
    },
    /// Decrements defender cooldowns.
    AdvanceDefenders {
        /// Scaled simulation time elapsed on this tick.
        dt: Duration,
    },
    /// Replaces the target handle held by a defender.
    AssignTarget {
        /// Defender whose target changes.
        defender: DefenderId,
        /// Newly acquired target, or `None` when nothing is in range.
        target: Option<AdversaryId>,
    },
    /// Fires a projectile from a ready defender toward its target.
    FireProjectile {
        /// Defender that fires.
        defender: DefenderId,
        /// Adversary the projectile homes toward.
        target: AdversaryId,
    },
    /// Moves projectiles, resolves contacts, and reaps destroyed adversaries.
    AdvanceProjectiles {
        /// Scaled simulation time elapsed on this tick.
        dt: Duration,
    },
    /// Requests construction of a defender on the provided tile.
    PlaceDefender {
        /// Kind of defender to construct.
        kind: DefenderKind,
        /// Tile that should host the defender.
        cell: CellCoord,
    },
    /// Requests an upgrade of an existing defender.
    UpgradeDefender {
        /// Defender to upgrade.
        defender: DefenderId,
    },
    /// Requests liquidation of an existing defender.
    SellDefender {
        /// Defender to sell.
        defender: DefenderId,
    },
    /// Credits the wave clear bonus and advances the wave counter.
    CompleteWave {
        /// Money credited for clearing the wave.
        bonus: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Reports that a fresh corridor was synthesized.
    CorridorGenerated {
        /// Tile adversaries spawn on.
        spawn: CellCoord,
        /// Tile adversaries try to reach.
        base: CellCoord,
        /// Number of turn points kept after simplification.
        waypoints: usize,
        /// Indicates whether the straight-line fallback was used.
        fallback: bool,
    },
    /// Confirms that the run was reset to its starting state.
    RunReset,
    /// Announces that a wave started.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Number of adversaries scheduled for the wave.
        spawn_budget: u32,
    },
    /// Confirms that an adversary entered the corridor.
    AdversarySpawned {
        /// Handle allocated to the adversary.
        adversary: AdversaryId,
        /// Variant of the adversary.
        kind: AdversaryKind,
        /// Indicates whether the adversary is a wave boss.
        boss: bool,
    },
    /// Reports that an adversary reached the base and cost a life.
    AdversaryLeaked {
        /// Handle of the removed adversary.
        adversary: AdversaryId,
        /// Variant of the removed adversary.
        kind: AdversaryKind,
        /// Lives left after the leak.
        lives: u32,
    },
    /// Reports that an adversary was destroyed and its bounty credited.
    AdversaryKilled {
        /// Handle of the removed adversary.
        adversary: AdversaryId,
        /// Variant of the removed adversary.
        kind: AdversaryKind,
        /// Indicates whether the removed adversary was a wave boss.
        boss: bool,
        /// Position where the adversary died.
        position: Vec2,
        /// Money credited for the kill.
        bounty: u32,
    },
    /// Confirms that a defender launched a projectile.
    ProjectileFired {
        /// Defender that fired.
        defender: DefenderId,
        /// Adversary targeted by the projectile.
        target: AdversaryId,
    },
    /// Reports that a projectile connected with its target.
    ProjectileHit {
        /// Adversary hit by the projectile.
        target: AdversaryId,
        /// Damage carried by the projectile.
        damage: f32,
    },
    /// Reports that a projectile dissipated because its target was gone.
    ProjectileFizzled {
        /// Stale handle the projectile was homing toward.
        target: AdversaryId,
    },
    /// Confirms that a defender was constructed.
    DefenderPlaced {
        /// Identifier allocated to the defender.
        defender: DefenderId,
        /// Kind of defender constructed.
        kind: DefenderKind,
        /// Tile now occupied by the defender.
        cell: CellCoord,
        /// Money deducted for construction.
        cost: u32,
    },
    /// Reports that a placement request was rejected.
    DefenderPlacementRejected {
        /// Kind of defender requested.
        kind: DefenderKind,
        /// Tile provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: CommandError,
    },
    /// Confirms that a defender was upgraded.
    DefenderUpgraded {
        /// Upgraded defender.
        defender: DefenderId,
        /// Level reached after the upgrade.
        level: u32,
        /// Money deducted for the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    DefenderUpgradeRejected {
        /// Defender targeted by the request.
        defender: DefenderId,
        /// Specific reason the upgrade failed.
        reason: CommandError,
    },
    /// Confirms that a defender was sold and its tile freed.
    DefenderSold {
        /// Removed defender.
        defender: DefenderId,
        /// Tile returned to the empty state.
        cell: CellCoord,
        /// Money credited for the sale.
        refund: u32,
    },
    /// Reports that a sell request was rejected.
    DefenderSaleRejected {
        /// Defender targeted by the request.
        defender: DefenderId,
        /// Specific reason the sale failed.
        reason: CommandError,
    },
    /// Reports that a wave was cleared and its bonus credited.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
        /// Money credited for clearing it.
        bonus: u32,
    },
    /// Announces that the last life was lost.
    GameOver {
        /// Wave during which the run ended.
        final_wave: u32,
    },
}

/// Reasons a player command may be rejected without mutating any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum CommandError {
    /// The requested tile lies outside the grid.
    #[error("tile lies outside the grid")]
    OutOfBounds,
    /// The requested tile is not empty.
    #[error("tile is not empty ({tile:?})")]
    TileNotEmpty {
        /// Current state of the requested tile.
        tile: Tile,
    },
    /// The player cannot afford the command.
    #[error("insufficient funds: {required} required, {available} available")]
    InsufficientFunds {
        /// Money the command costs.
        required: u32,
        /// Money currently available.
        available: u32,
    },
    /// A build was attempted without selecting a defender kind.
    #[error("no defender type selected")]
    NoBuildTypeSelected,
    /// An upgrade or sale was attempted without selecting a defender.
    #[error("no defender selected")]
    NoSelection,
    /// The referenced defender no longer exists.
    #[error("defender does not exist")]
    MissingDefender,
    /// The run already ended.
    #[error("the run is over")]
    GameOver,
}

/// State of a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Free tile that accepts a defender.
    Empty,
    /// Part of the corridor between the spawn and the base.
    Corridor,
    /// First corridor tile where adversaries enter.
    Spawn,
    /// Last corridor tile adversaries try to reach.
    Base,
    /// Tile hosting a defender.
    Occupied,
}

impl Tile {
    /// Reports whether the tile belongs to the corridor.
    #[must_use]
    pub const fn is_corridor(self) -> bool {
        matches!(self, Self::Corridor | Self::Spawn | Self::Base)
    }
}

/// Generational handle referencing an adversary in the world's entity table.
///
/// A handle becomes stale once its adversary is removed; the slot may be reused
/// by a later adversary with a higher generation, so stale handles never alias
/// a living entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId {
    index: u32,
    generation: u32,
}

impl AdversaryId {
    /// Creates a handle from a slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index within the entity table.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Unique identifier assigned to a defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the defender identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// World-space center of the cell for the provided tile length.
    #[must_use]
    pub fn center(self, tile_length: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * tile_length,
            (self.row as f32 + 0.5) * tile_length,
        )
    }
}

/// Immutable representation of a single adversary used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdversarySnapshot {
    /// Handle of the adversary.
    pub id: AdversaryId,
    /// Variant of the adversary.
    pub kind: AdversaryKind,
    /// Indicates whether the adversary is a wave boss.
    pub boss: bool,
    /// Continuous world-space position.
    pub position: Vec2,
    /// Remaining health.
    pub hp: f32,
    /// Health at spawn.
    pub max_hp: f32,
    /// Collision radius.
    pub radius: f32,
    /// Indicates whether a slowing status is active.
    pub slowed: bool,
    /// Index of the waypoint the adversary walks toward.
    pub waypoint_index: usize,
}

impl AdversarySnapshot {
    /// Remaining health as a fraction of the spawn health.
    #[must_use]
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing every live adversary in table order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdversaryView {
    snapshots: Vec<AdversarySnapshot>,
}

impl AdversaryView {
    /// Creates a new view, preserving the provided iteration order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<AdversarySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in entity-table order.
    pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided handle.
    #[must_use]
    pub fn get(&self, id: AdversaryId) -> Option<&AdversarySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of captured adversaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AdversarySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single defender used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderSnapshot {
    /// Identifier allocated to the defender by the world.
    pub id: DefenderId,
    /// Kind of defender that was constructed.
    pub kind: DefenderKind,
    /// Tile occupied by the defender.
    pub cell: CellCoord,
    /// World-space center of the defender's tile.
    pub position: Vec2,
    /// Current targeting radius.
    pub range: f32,
    /// Current projectile damage.
    pub damage: f32,
    /// Current delay between shots.
    pub fire_interval: Duration,
    /// Time left before the defender may fire again.
    pub cooldown: Duration,
    /// One-based upgrade level.
    pub level: u32,
    /// Money invested in the defender so far.
    pub total_spent: u32,
    /// Price of the next upgrade.
    pub upgrade_cost: u32,
    /// Refund credited when selling the defender.
    pub sell_value: u32,
    /// Target handle held since the previous tick, possibly stale.
    pub target: Option<AdversaryId>,
}

impl DefenderSnapshot {
    /// Reports whether the cooldown elapsed.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.cooldown.is_zero()
    }
}

/// Read-only snapshot describing every defender ordered by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefenderView {
    snapshots: Vec<DefenderSnapshot>,
}

impl DefenderView {
    /// Creates a new defender view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured defender snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured defenders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DefenderSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Kind of the defender that fired the projectile.
    pub kind: DefenderKind,
    /// Continuous world-space position.
    pub position: Vec2,
    /// Handle of the adversary the projectile homes toward.
    pub target: AdversaryId,
}

/// Read-only snapshot describing every in-flight projectile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Target acquired by a defender during the current targeting pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderTarget {
    /// Defender that holds the target.
    pub defender: DefenderId,
    /// Adversary the defender aims at.
    pub adversary: AdversaryId,
}
