//! Greedy player that keeps the corridor lined with defenders.

use std::fmt;

use log::debug;

use corridor_defence_core::{CellCoord, DefenderKind, Tile};
use corridor_defence_simulation::{Simulation, SimulationHooks};

/// Action the autoplayer took on a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Move {
    Built { kind: DefenderKind, cell: CellCoord },
    Upgraded { cell: CellCoord, level: u32 },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Built { kind, cell } => {
                write!(f, "built {kind:?} at ({}, {})", cell.column(), cell.row())
            }
            Self::Upgraded { cell, level } => write!(
                f,
                "upgraded ({}, {}) to level {level}",
                cell.column(),
                cell.row()
            ),
        }
    }
}

/// Builds the most expensive affordable defender on the empty tile closest to
/// the corridor, otherwise upgrades the defender with the cheapest upgrade.
#[derive(Debug, Default)]
pub(crate) struct Autoplayer {
    moves: u32,
}

impl Autoplayer {
    pub(crate) fn moves(&self) -> u32 {
        self.moves
    }

    /// Takes at most one action against the simulation.
    pub(crate) fn act<H: SimulationHooks>(&mut self, simulation: &mut Simulation<H>) -> Option<Move> {
        if simulation.is_game_over() {
            return None;
        }

        let taken = self.try_build(simulation).or_else(|| self.try_upgrade(simulation));
        if let Some(taken) = taken {
            self.moves += 1;
            debug!("autoplay {taken}");
        }
        taken
    }

    fn try_build<H: SimulationHooks>(&self, simulation: &mut Simulation<H>) -> Option<Move> {
        let money = simulation.snapshot().money;
        let kind = DefenderKind::ALL
            .into_iter()
            .filter(|kind| kind.cost() <= money)
            .max_by_key(|kind| kind.cost())?;
        let cell = closest_empty_tile(simulation)?;

        simulation.deselect();
        let _ = simulation.select_build_type(kind);
        let built = simulation.attempt_build(cell.column(), cell.row());
        simulation.deselect();
        built.ok().map(|_| Move::Built { kind, cell })
    }

    fn try_upgrade<H: SimulationHooks>(&self, simulation: &mut Simulation<H>) -> Option<Move> {
        let snapshot = simulation.snapshot();
        let cheapest = snapshot
            .defenders
            .iter()
            .filter(|defender| defender.upgrade_cost <= snapshot.money)
            .min_by_key(|defender| defender.upgrade_cost)?;
        let cell = cheapest.cell;

        let _ = simulation.select_defender_at(cell.column(), cell.row())?;
        let upgraded = simulation.upgrade_selected();
        simulation.deselect();
        upgraded.ok().map(|level| Move::Upgraded { cell, level })
    }
}

/// Empty tile with the smallest Manhattan distance to any corridor tile,
/// ties resolved in row-major order.
fn closest_empty_tile<H: SimulationHooks>(simulation: &Simulation<H>) -> Option<CellCoord> {
    let grid = simulation.grid();
    let corridor = grid.corridor();
    grid.iter()
        .filter(|(_, tile)| *tile == Tile::Empty)
        .filter_map(|(cell, _)| {
            corridor
                .iter()
                .map(|path| path.manhattan_distance(cell))
                .min()
                .map(|distance| (distance, cell))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, cell)| cell)
}
