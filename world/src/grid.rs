//! Tile grid and corridor synthesis used by the world crate.

use glam::Vec2;
use log::{debug, warn};
use rand::Rng;

use corridor_defence_core::{CellCoord, GridConfig, Tile};

/// Rectangular tile grid carved by a single corridor from the left edge to the right edge.
///
/// The corridor is produced by a goal-biased random walk that only steps
/// forward, up, or down and never revisits a tile. The raw tile sequence is
/// kept alongside its simplified waypoint list, which retains the first tile,
/// the last tile, and every tile where the direction of travel changes.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<Tile>,
    corridor: Vec<CellCoord>,
    waypoints: Vec<CellCoord>,
    fallback: bool,
}

impl Grid {
    /// Synthesizes a fresh grid using the provided random source.
    pub(crate) fn generate<R>(config: &GridConfig, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let columns = config.columns.max(2);
        let rows = config.rows.max(1);

        let (corridor, fallback) =
            match synthesize_corridor(columns, rows, config.max_path_attempts, rng) {
                Some(corridor) => (corridor, false),
                None => {
                    warn!(
                        "corridor synthesis failed on a {columns}x{rows} grid after {} attempts; using a straight corridor",
                        config.max_path_attempts
                    );
                    (straight_corridor(columns, rows), true)
                }
            };

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut grid = Self {
            columns,
            rows,
            tile_length: config.tile_length,
            tiles: vec![Tile::Empty; capacity],
            waypoints: simplify(&corridor),
            corridor,
            fallback,
        };

        let corridor = grid.corridor.clone();
        for cell in &corridor {
            let _ = grid.set_tile(*cell, Tile::Corridor);
        }
        if let (Some(first), Some(last)) = (corridor.first(), corridor.last()) {
            let _ = grid.set_tile(*first, Tile::Spawn);
            let _ = grid.set_tile(*last, Tile::Base);
        }

        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// State of the provided tile, or `None` when it lies outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Iterator over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// Tile adversaries spawn on.
    #[must_use]
    pub fn spawn(&self) -> CellCoord {
        self.corridor
            .first()
            .copied()
            .unwrap_or(CellCoord::new(0, self.rows / 2))
    }

    /// Tile adversaries try to reach.
    #[must_use]
    pub fn base(&self) -> CellCoord {
        self.corridor
            .last()
            .copied()
            .unwrap_or(CellCoord::new(self.columns - 1, self.rows / 2))
    }

    /// Every corridor tile from spawn to base.
    #[must_use]
    pub fn corridor(&self) -> &[CellCoord] {
        &self.corridor
    }

    /// Simplified turn points adversaries interpolate between.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// World-space centers of the waypoints.
    #[must_use]
    pub fn waypoint_positions(&self) -> Vec<Vec2> {
        self.waypoints
            .iter()
            .map(|cell| cell.center(self.tile_length))
            .collect()
    }

    /// Reports whether synthesis gave up and produced the straight fallback corridor.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.fallback
    }

    /// Replaces the state of a tile, returning `false` when the cell is out of bounds.
    pub(crate) fn set_tile(&mut self, cell: CellCoord, tile: Tile) -> bool {
        match self.index(cell).and_then(|index| self.tiles.get_mut(index)) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn synthesize_corridor<R>(
    columns: u32,
    rows: u32,
    attempts: u32,
    rng: &mut R,
) -> Option<Vec<CellCoord>>
where
    R: Rng + ?Sized,
{
    // Spawn and base rows stay off the outer border rows.
    if rows < 3 {
        return None;
    }

    let start = CellCoord::new(0, rng.gen_range(1..=rows - 2));
    let goal = CellCoord::new(columns - 1, rng.gen_range(1..=rows - 2));

    for attempt in 0..attempts {
        if let Some(corridor) = random_walk(start, goal, columns, rows, rng) {
            debug!(
                "corridor from {start:?} to {goal:?} found on attempt {} ({} tiles)",
                attempt + 1,
                corridor.len()
            );
            return Some(corridor);
        }
    }

    None
}

fn random_walk<R>(
    start: CellCoord,
    goal: CellCoord,
    columns: u32,
    rows: u32,
    rng: &mut R,
) -> Option<Vec<CellCoord>>
where
    R: Rng + ?Sized,
{
    let width = usize::try_from(columns).ok()?;
    let cell_count = width.checked_mul(usize::try_from(rows).ok()?)?;
    let mut visited = vec![false; cell_count];
    let index = |cell: CellCoord| cell.row() as usize * width + cell.column() as usize;

    let mut current = start;
    visited[index(current)] = true;
    let mut corridor = vec![current];

    while current != goal {
        let mut best: Option<(f32, CellCoord)> = None;
        for candidate in forward_moves(current, columns, rows) {
            if visited[index(candidate)] {
                continue;
            }

            let jitter: f32 = rng.gen_range(-1.0..1.0);
            let score = candidate.manhattan_distance(goal) as f32 + jitter;
            match best {
                Some((best_score, _)) if best_score <= score => {}
                _ => best = Some((score, candidate)),
            }
        }

        let (_, next) = best?;
        visited[index(next)] = true;
        corridor.push(next);
        current = next;
    }

    Some(corridor)
}

fn forward_moves(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 3];
    let mut count = 0;

    if cell.column() + 1 < columns {
        candidates[count] = Some(CellCoord::new(cell.column() + 1, cell.row()));
        count += 1;
    }

    if cell.row() > 1 {
        candidates[count] = Some(CellCoord::new(cell.column(), cell.row() - 1));
        count += 1;
    }

    if cell.row() + 2 < rows {
        candidates[count] = Some(CellCoord::new(cell.column(), cell.row() + 1));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn straight_corridor(columns: u32, rows: u32) -> Vec<CellCoord> {
    let row = rows / 2;
    (0..columns).map(|column| CellCoord::new(column, row)).collect()
}

fn simplify(corridor: &[CellCoord]) -> Vec<CellCoord> {
    if corridor.len() < 2 {
        return corridor.to_vec();
    }

    let step = |from: CellCoord, to: CellCoord| {
        (
            i64::from(to.column()) - i64::from(from.column()),
            i64::from(to.row()) - i64::from(from.row()),
        )
    };

    let mut waypoints = vec![corridor[0]];
    let mut heading = step(corridor[0], corridor[1]);
    for pair in corridor[1..].windows(2) {
        let direction = step(pair[0], pair[1]);
        if direction != heading {
            waypoints.push(pair[0]);
            heading = direction;
        }
    }
    waypoints.push(corridor[corridor.len() - 1]);
    waypoints
}
