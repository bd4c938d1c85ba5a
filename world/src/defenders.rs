//! Authoritative defender state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;

use corridor_defence_core::{
    duration_from_secs, AdversaryId, CellCoord, DefenderId, DefenderKind, DefenderSnapshot,
    UpgradeConfig,
};

/// Snapshot of a defender stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct DefenderState {
    /// Identifier allocated by the world for the defender.
    pub(crate) id: DefenderId,
    /// Kind of defender that was constructed.
    pub(crate) kind: DefenderKind,
    /// Tile occupied by the defender.
    pub(crate) cell: CellCoord,
    /// Center of the occupied tile.
    pub(crate) position: Vec2,
    pub(crate) range: f32,
    pub(crate) damage: f32,
    pub(crate) fire_interval: Duration,
    pub(crate) cooldown: Duration,
    pub(crate) level: u32,
    /// Construction cost plus every upgrade paid so far.
    pub(crate) total_spent: u32,
    /// Target handle held since the last targeting pass; may be stale.
    pub(crate) target: Option<AdversaryId>,
}

impl DefenderState {
    fn new(id: DefenderId, kind: DefenderKind, cell: CellCoord, tile_length: f32) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            cell,
            position: cell.center(tile_length),
            range: stats.range,
            damage: stats.damage,
            fire_interval: stats.fire_interval(),
            cooldown: Duration::ZERO,
            level: 1,
            total_spent: stats.cost,
            target: None,
        }
    }

    pub(crate) fn ready(&self) -> bool {
        self.cooldown.is_zero()
    }

    pub(crate) fn in_range(&self, position: Vec2) -> bool {
        self.position.distance(position) <= self.range
    }

    pub(crate) fn cool_down(&mut self, dt: Duration) {
        self.cooldown = self.cooldown.saturating_sub(dt);
    }

    /// Applies one upgrade level and records the price paid for it.
    pub(crate) fn upgrade(&mut self, cost: u32, tuning: &UpgradeConfig) {
        self.damage *= tuning.damage_factor;
        self.range *= tuning.range_factor;
        self.fire_interval =
            duration_from_secs(self.fire_interval.as_secs_f32() * tuning.fire_interval_factor);
        self.level = self.level.saturating_add(1);
        self.total_spent = self.total_spent.saturating_add(cost);
    }

    pub(crate) fn snapshot(&self, tuning: &UpgradeConfig) -> DefenderSnapshot {
        DefenderSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            range: self.range,
            damage: self.damage,
            fire_interval: self.fire_interval,
            cooldown: self.cooldown,
            level: self.level,
            total_spent: self.total_spent,
            upgrade_cost: tuning.upgrade_cost(self.total_spent),
            sell_value: tuning.sell_value(self.total_spent),
            target: self.target,
        }
    }
}

/// Registry that stores defenders and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct DefenderRegistry {
    entries: BTreeMap<DefenderId, DefenderState>,
    next_defender_id: DefenderId,
}

impl DefenderRegistry {
    /// Creates an empty defender registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_defender_id: DefenderId::new(0),
        }
    }

    /// Builds a level one defender and returns its freshly allocated identifier.
    pub(crate) fn insert(
        &mut self,
        kind: DefenderKind,
        cell: CellCoord,
        tile_length: f32,
    ) -> DefenderId {
        let id = self.next_defender_id;
        self.next_defender_id = DefenderId::new(id.get().saturating_add(1));
        let _ = self
            .entries
            .insert(id, DefenderState::new(id, kind, cell, tile_length));
        id
    }

    pub(crate) fn get_mut(&mut self, id: DefenderId) -> Option<&mut DefenderState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: DefenderId) -> Option<DefenderState> {
        self.entries.remove(&id)
    }

    /// Finds the defender standing on the provided tile.
    pub(crate) fn at(&self, cell: CellCoord) -> Option<&DefenderState> {
        self.entries.values().find(|defender| defender.cell == cell)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DefenderState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut DefenderState> {
        self.entries.values_mut()
    }

    /// Drops every defender. Identifiers keep counting so old ones never resolve again.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
