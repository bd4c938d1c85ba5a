//! Closed variant sets for adversaries and defenders together with their stat tables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{config::duration_from_secs, WaveConfig};

/// Types of adversaries that can walk the corridor.
///
/// Bosses are not a separate variant: every boss wave rolls one of these and
/// scales the result with the boss multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryKind {
    /// Baseline adversary available from the first wave.
    Normal,
    /// Fragile adversary that outpaces every other variant.
    Fast,
    /// Slow adversary with a large health pool.
    Tank,
}

/// Stats fixed for a single adversary at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdversaryStats {
    /// Health the adversary spawns with.
    pub max_hp: f32,
    /// Movement speed measured in world units per second.
    pub speed: f32,
    /// Collision radius used by presentation collaborators.
    pub radius: f32,
    /// Money credited when the adversary is destroyed.
    pub bounty: u32,
}

#[derive(Clone, Copy, Debug)]
struct AdversaryProfile {
    hp_factor: f32,
    base_speed: f32,
    speed_per_wave: f32,
    radius: f32,
}

const BOSS_HP_FACTOR: f32 = 10.0;
const BOSS_SPEED_FACTOR: f32 = 0.8;
const BOSS_RADIUS: f32 = 25.0;
const BOSS_BOUNTY_FACTOR: u64 = 10;

impl AdversaryKind {
    const fn profile(self) -> AdversaryProfile {
        match self {
            Self::Normal => AdversaryProfile {
                hp_factor: 1.0,
                base_speed: 100.0,
                speed_per_wave: 1.0,
                radius: 14.0,
            },
            Self::Fast => AdversaryProfile {
                hp_factor: 0.6,
                base_speed: 150.0,
                speed_per_wave: 2.0,
                radius: 10.0,
            },
            Self::Tank => AdversaryProfile {
                hp_factor: 2.5,
                base_speed: 60.0,
                speed_per_wave: 0.0,
                radius: 18.0,
            },
        }
    }

    /// Resolves the stats of an adversary spawned during the provided wave.
    ///
    /// Health grows geometrically with `difficulty_multiplier ^ (wave - 1)`.
    /// A boss keeps its variant's profile with health and bounty multiplied by
    /// ten, speed multiplied by 0.8 and a radius of 25. Waves are one-based; a
    /// zero wave is treated as the first wave.
    #[must_use]
    pub fn stats(self, wave: u32, tuning: &WaveConfig, boss: bool) -> AdversaryStats {
        let wave = wave.max(1);
        let exponent = i32::try_from(wave - 1).unwrap_or(i32::MAX);
        let multiplier = tuning.difficulty_multiplier.powi(exponent);
        let profile = self.profile();

        let mut max_hp = tuning.base_hp * multiplier * profile.hp_factor;
        let mut speed = profile.base_speed + profile.speed_per_wave * wave as f32;
        let mut radius = profile.radius;
        let mut bounty = u64::from(tuning.base_reward) * (10 + u64::from(wave)) / 10;
        if boss {
            max_hp *= BOSS_HP_FACTOR;
            speed *= BOSS_SPEED_FACTOR;
            radius = BOSS_RADIUS;
            bounty = bounty.saturating_mul(BOSS_BOUNTY_FACTOR);
        }

        AdversaryStats {
            max_hp,
            speed,
            radius,
            bounty: u32::try_from(bounty).unwrap_or(u32::MAX),
        }
    }
}

/// Types of defenders that can be constructed on empty tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenderKind {
    /// Standard turret suited to early waves.
    Basic,
    /// Long range, high damage, slow fire.
    Sniper,
    /// Fast firing, low damage.
    Rapid,
    /// Projectiles slow their target.
    Frost,
    /// Projectiles damage every adversary around the impact.
    Splash,
}

/// Effect applied by a projectile in addition to its direct damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileEffect {
    /// Plain damage against the captured target.
    None,
    /// Refreshes the target's slowing status.
    Slow,
    /// Damages every live adversary within the splash radius of the impact.
    Splash,
}

/// Base stats for a freshly built level one defender.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderStats {
    /// Money required to construct the defender.
    pub cost: u32,
    /// Targeting radius measured in world units.
    pub range: f32,
    /// Damage carried by every projectile.
    pub damage: f32,
    /// Seconds between successive shots.
    pub fire_interval_secs: f32,
}

impl DefenderStats {
    /// Fire interval expressed as a duration.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        duration_from_secs(self.fire_interval_secs)
    }
}

impl DefenderKind {
    /// Every defender variant in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Basic,
        Self::Sniper,
        Self::Rapid,
        Self::Frost,
        Self::Splash,
    ];

    /// Returns the level one stat table for the defender kind.
    #[must_use]
    pub const fn stats(self) -> DefenderStats {
        match self {
            Self::Basic => DefenderStats {
                cost: 50,
                range: 150.0,
                damage: 15.0,
                fire_interval_secs: 0.8,
            },
            Self::Sniper => DefenderStats {
                cost: 150,
                range: 400.0,
                damage: 80.0,
                fire_interval_secs: 2.0,
            },
            Self::Rapid => DefenderStats {
                cost: 250,
                range: 120.0,
                damage: 5.0,
                fire_interval_secs: 0.1,
            },
            Self::Frost => DefenderStats {
                cost: 300,
                range: 180.0,
                damage: 5.0,
                fire_interval_secs: 1.0,
            },
            Self::Splash => DefenderStats {
                cost: 400,
                range: 200.0,
                damage: 30.0,
                fire_interval_secs: 1.5,
            },
        }
    }

    /// Construction cost of the defender kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Effect carried by projectiles fired from this kind.
    #[must_use]
    pub const fn effect(self) -> ProjectileEffect {
        match self {
            Self::Frost => ProjectileEffect::Slow,
            Self::Splash => ProjectileEffect::Splash,
            Self::Basic | Self::Sniper | Self::Rapid => ProjectileEffect::None,
        }
    }
}
