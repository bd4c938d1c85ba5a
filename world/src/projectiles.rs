//! Homing projectile motion.

use std::time::Duration;

use glam::Vec2;

use corridor_defence_core::{AdversaryId, DefenderKind, ProjectileSnapshot};

/// Projectile in flight toward a captured adversary handle.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    /// Kind of the defender that fired, which decides the on-hit effect.
    pub(crate) kind: DefenderKind,
    pub(crate) position: Vec2,
    pub(crate) target: AdversaryId,
    pub(crate) damage: f32,
    speed: f32,
    /// Set once the projectile hit or fizzled; resolved projectiles are swept after the pass.
    pub(crate) resolved: bool,
}

/// Result of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Flight {
    /// Still travelling.
    InFlight,
    /// Reached contact distance of the target standing at `impact`.
    Hit { impact: Vec2 },
    /// Target handle no longer resolves to a live adversary.
    Fizzled,
}

impl Projectile {
    pub(crate) fn new(
        kind: DefenderKind,
        origin: Vec2,
        target: AdversaryId,
        damage: f32,
        speed: f32,
    ) -> Self {
        Self {
            kind,
            position: origin,
            target,
            damage,
            speed,
            resolved: false,
        }
    }

    /// Homes toward the target position, or fizzles when the target is gone.
    ///
    /// Contact is tested before moving, so a projectile launched from inside the
    /// contact radius still connects on its first tick.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        target_position: Option<Vec2>,
        contact_radius: f32,
    ) -> Flight {
        let Some(target) = target_position else {
            self.resolved = true;
            return Flight::Fizzled;
        };

        let offset = target - self.position;
        let distance = offset.length();
        if distance <= contact_radius {
            self.resolved = true;
            return Flight::Hit { impact: target };
        }

        let step = (self.speed * dt.as_secs_f32()).min(distance);
        self.position += offset / distance * step;
        Flight::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            kind: self.kind,
            position: self.position,
            target: self.target,
        }
    }
}
