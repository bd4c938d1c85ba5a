//! Adversary state and corridor motion.

use std::time::Duration;

use glam::Vec2;

use corridor_defence_core::{
    AdversaryId, AdversaryKind, AdversarySnapshot, AdversaryStats, CombatConfig,
};

/// Adversary stored inside the world's entity table.
#[derive(Clone, Debug)]
pub(crate) struct Adversary {
    pub(crate) kind: AdversaryKind,
    pub(crate) boss: bool,
    pub(crate) position: Vec2,
    /// Index of the waypoint the adversary is walking toward.
    pub(crate) waypoint_index: usize,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) speed: f32,
    pub(crate) radius: f32,
    pub(crate) bounty: u32,
    slow_remaining: Duration,
    /// Set once the adversary ran past the final waypoint.
    pub(crate) reached_end: bool,
}

impl Adversary {
    /// Creates an adversary standing on the first waypoint and heading for the second.
    pub(crate) fn spawn(
        kind: AdversaryKind,
        boss: bool,
        stats: AdversaryStats,
        origin: Vec2,
    ) -> Self {
        Self {
            kind,
            boss,
            position: origin,
            waypoint_index: 1,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            speed: stats.speed,
            radius: stats.radius,
            bounty: stats.bounty,
            slow_remaining: Duration::ZERO,
            reached_end: false,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub(crate) fn is_slowed(&self) -> bool {
        !self.slow_remaining.is_zero()
    }

    /// Moves the adversary toward its current waypoint.
    ///
    /// Reaching a waypoint only advances the index; the adversary starts moving
    /// toward the next waypoint on the following tick.
    pub(crate) fn advance(&mut self, dt: Duration, waypoints: &[Vec2], combat: &CombatConfig) {
        if self.reached_end {
            return;
        }

        let mut speed = self.speed;
        if self.is_slowed() {
            speed *= combat.slow_factor;
            self.slow_remaining = self.slow_remaining.saturating_sub(dt);
        }

        let Some(target) = waypoints.get(self.waypoint_index).copied() else {
            self.reached_end = true;
            return;
        };

        let offset = target - self.position;
        let distance = offset.length();
        if distance < combat.waypoint_tolerance {
            self.waypoint_index += 1;
            return;
        }

        let step = (speed * dt.as_secs_f32()).min(distance);
        self.position += offset / distance * step;
    }

    /// Subtracts damage, clamping health at zero.
    pub(crate) fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }

    /// Starts or refreshes the slowing status.
    pub(crate) fn apply_slow(&mut self, duration: Duration) {
        self.slow_remaining = duration;
    }

    pub(crate) fn snapshot(&self, id: AdversaryId) -> AdversarySnapshot {
        AdversarySnapshot {
            id,
            kind: self.kind,
            boss: self.boss,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            radius: self.radius,
            slowed: self.is_slowed(),
            waypoint_index: self.waypoint_index,
        }
    }
}
