//! Tunable simulation parameters shared by the world, the systems, and adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete tuning surface for a single run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid dimensions and corridor synthesis parameters.
    pub grid: GridConfig,
    /// Starting funds and lives.
    pub economy: EconomyConfig,
    /// Movement, projectile and status-effect parameters.
    pub combat: CombatConfig,
    /// Per-level multipliers and pricing ratios.
    pub upgrades: UpgradeConfig,
    /// Wave scheduling and adversary scaling parameters.
    pub waves: WaveConfig,
}

impl GameConfig {
    /// Verifies that every parameter lies within its supported range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.combat.validate()?;
        self.upgrades.validate()?;
        self.waves.validate()
    }
}

/// Grid dimensions and corridor synthesis parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of tile columns; the spawn sits on column zero and the base on the last one.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a square tile in world units.
    pub tile_length: f32,
    /// Number of random walks attempted before falling back to a straight corridor.
    pub max_path_attempts: u32,
    /// Seed for the corridor synthesis generator.
    pub seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 12,
            rows: 10,
            tile_length: 64.0,
            max_path_attempts: 1_000,
            seed: 0x5eed_c0de_d1ce_f00d,
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 2 || self.rows == 0 {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns,
                rows: self.rows,
            });
        }
        positive("grid.tile_length", self.tile_length)
    }
}

/// Starting funds and lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money available at the start of a run.
    pub initial_money: u32,
    /// Lives available at the start of a run; reaching zero ends the run.
    pub initial_lives: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_money: 250,
            initial_lives: 20,
        }
    }
}

/// Movement, projectile and status-effect parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Distance at which a projectile connects with its target.
    pub contact_radius: f32,
    /// Radius around the impact damaged by splash projectiles.
    pub splash_radius: f32,
    /// Fraction of its speed a slowed adversary keeps.
    pub slow_factor: f32,
    /// Seconds a slowing hit lasts; a new hit refreshes the timer.
    pub slow_duration_secs: f32,
    /// Distance at which an adversary counts as having reached a waypoint.
    pub waypoint_tolerance: f32,
    /// Multiplier applied to the frame delta while fast speed is toggled on.
    pub fast_speed_multiplier: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 600.0,
            contact_radius: 15.0,
            splash_radius: 64.0,
            slow_factor: 0.5,
            slow_duration_secs: 2.0,
            waypoint_tolerance: 5.0,
            fast_speed_multiplier: 2,
        }
    }
}

impl CombatConfig {
    /// Duration of a single slowing hit.
    #[must_use]
    pub fn slow_duration(&self) -> Duration {
        duration_from_secs(self.slow_duration_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("combat.projectile_speed", self.projectile_speed)?;
        positive("combat.contact_radius", self.contact_radius)?;
        positive("combat.waypoint_tolerance", self.waypoint_tolerance)?;
        non_negative("combat.splash_radius", self.splash_radius)?;
        non_negative("combat.slow_duration_secs", self.slow_duration_secs)?;
        if !(self.slow_factor > 0.0 && self.slow_factor <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "combat.slow_factor",
            });
        }
        if self.fast_speed_multiplier == 0 {
            return Err(ConfigError::OutOfRange {
                field: "combat.fast_speed_multiplier",
            });
        }
        Ok(())
    }
}

/// Per-level multipliers and pricing ratios.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Damage multiplier applied per upgrade; must exceed one.
    pub damage_factor: f32,
    /// Range multiplier applied per upgrade; must exceed one.
    pub range_factor: f32,
    /// Fire interval multiplier applied per upgrade; must lie below one.
    pub fire_interval_factor: f32,
    /// Upgrade price as a percentage of the cumulative spend.
    pub upgrade_cost_percent: u32,
    /// Sell refund as a percentage of the cumulative spend; must lie below 100.
    pub sell_value_percent: u32,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            damage_factor: 1.3,
            range_factor: 1.1,
            fire_interval_factor: 0.9,
            upgrade_cost_percent: 50,
            sell_value_percent: 70,
        }
    }
}

impl UpgradeConfig {
    /// Price of the next upgrade for a defender with the provided cumulative spend.
    #[must_use]
    pub fn upgrade_cost(&self, total_spent: u32) -> u32 {
        percent_of(total_spent, self.upgrade_cost_percent)
    }

    /// Refund credited when selling a defender with the provided cumulative spend.
    #[must_use]
    pub fn sell_value(&self, total_spent: u32) -> u32 {
        percent_of(total_spent, self.sell_value_percent)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.damage_factor > 1.0) {
            return Err(ConfigError::UpgradeNotImproving {
                field: "upgrades.damage_factor",
            });
        }
        if !(self.range_factor > 1.0) {
            return Err(ConfigError::UpgradeNotImproving {
                field: "upgrades.range_factor",
            });
        }
        if !(self.fire_interval_factor > 0.0 && self.fire_interval_factor < 1.0) {
            return Err(ConfigError::UpgradeNotImproving {
                field: "upgrades.fire_interval_factor",
            });
        }
        if self.sell_value_percent >= 100 {
            return Err(ConfigError::SellValueNotBelowSpend {
                percent: self.sell_value_percent,
            });
        }
        Ok(())
    }
}

/// Wave scheduling and adversary scaling parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Seed for the adversary variant roll.
    pub seed: u64,
    /// Spawn budget intercept.
    pub base_count: u32,
    /// Spawn budget growth per wave, floored after multiplication.
    pub count_per_wave: f32,
    /// Seconds between the start of a wave and its first spawn.
    pub lead_in_secs: f32,
    /// Spawn interval at wave zero.
    pub base_interval_secs: f32,
    /// Reduction of the spawn interval per wave.
    pub interval_step_secs: f32,
    /// Lower bound of the spawn interval.
    pub min_interval_secs: f32,
    /// Flat portion of the wave clear bonus.
    pub clear_bonus_base: u32,
    /// Wave-scaled portion of the wave clear bonus.
    pub clear_bonus_per_wave: u32,
    /// Seconds of simulated time between a cleared wave and the next one.
    pub intermission_secs: f32,
    /// Geometric health multiplier applied per wave.
    pub difficulty_multiplier: f32,
    /// Health of a first wave normal adversary.
    pub base_hp: f32,
    /// Bounty basis before wave scaling.
    pub base_reward: u32,
    /// Every wave divisible by this value spawns bosses only.
    pub boss_interval: u32,
    /// Fast adversaries may appear on waves strictly after this one.
    pub fast_unlock_wave: u32,
    /// Probability of rolling a fast adversary once unlocked.
    pub fast_chance: f32,
    /// Tank adversaries may appear on waves strictly after this one.
    pub tank_unlock_wave: u32,
    /// Probability of rolling a tank adversary once unlocked.
    pub tank_chance: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            seed: 0x0bad_5eed_2bad_5eed,
            base_count: 5,
            count_per_wave: 1.5,
            lead_in_secs: 2.0,
            base_interval_secs: 1.5,
            interval_step_secs: 0.05,
            min_interval_secs: 0.2,
            clear_bonus_base: 50,
            clear_bonus_per_wave: 10,
            intermission_secs: 2.0,
            difficulty_multiplier: 1.2,
            base_hp: 30.0,
            base_reward: 10,
            boss_interval: 10,
            fast_unlock_wave: 3,
            fast_chance: 0.2,
            tank_unlock_wave: 5,
            tank_chance: 0.2,
        }
    }
}

impl WaveConfig {
    /// Number of adversaries spawned during the provided wave.
    #[must_use]
    pub fn spawn_budget(&self, wave: u32) -> u32 {
        let growth = (wave as f32 * self.count_per_wave).floor();
        self.base_count.saturating_add(growth as u32)
    }

    /// Delay between successive spawns during the provided wave.
    #[must_use]
    pub fn spawn_interval(&self, wave: u32) -> Duration {
        let secs = self.base_interval_secs - wave as f32 * self.interval_step_secs;
        duration_from_secs(secs.max(self.min_interval_secs))
    }

    /// Money credited when the provided wave is cleared.
    #[must_use]
    pub fn clear_bonus(&self, wave: u32) -> u32 {
        self.clear_bonus_base
            .saturating_add(wave.saturating_mul(self.clear_bonus_per_wave))
    }

    /// Delay between the start of a wave and its first spawn.
    #[must_use]
    pub fn lead_in(&self) -> Duration {
        duration_from_secs(self.lead_in_secs)
    }

    /// Pause between a cleared wave and the start of the next one.
    #[must_use]
    pub fn intermission(&self) -> Duration {
        duration_from_secs(self.intermission_secs)
    }

    /// Reports whether the provided wave is a boss wave.
    #[must_use]
    pub fn is_boss_wave(&self, wave: u32) -> bool {
        self.boss_interval != 0 && wave != 0 && wave % self.boss_interval == 0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("waves.min_interval_secs", self.min_interval_secs)?;
        positive("waves.base_hp", self.base_hp)?;
        positive("waves.difficulty_multiplier", self.difficulty_multiplier)?;
        non_negative("waves.count_per_wave", self.count_per_wave)?;
        non_negative("waves.lead_in_secs", self.lead_in_secs)?;
        non_negative("waves.intermission_secs", self.intermission_secs)?;
        non_negative("waves.interval_step_secs", self.interval_step_secs)?;
        for (field, chance) in [
            ("waves.fast_chance", self.fast_chance),
            ("waves.tank_chance", self.tank_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::OutOfRange { field });
            }
        }
        if self.base_count == 0 && self.count_per_wave <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "waves.base_count",
            });
        }
        Ok(())
    }
}

/// Reasons a configuration is rejected by [`GameConfig::validate`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cannot host a corridor from the left edge to the right edge.
    #[error("grid of {columns}x{rows} tiles is too small; at least 2 columns and 1 row are required")]
    GridTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// A parameter that must be strictly positive was not.
    #[error("`{field}` must be a positive finite number")]
    NotPositive {
        /// Dotted path of the offending field.
        field: &'static str,
    },
    /// A parameter fell outside its supported interval.
    #[error("`{field}` is outside its supported range")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
    },
    /// An upgrade multiplier would make a defender worse.
    #[error("`{field}` must improve the defender on every upgrade")]
    UpgradeNotImproving {
        /// Dotted path of the offending field.
        field: &'static str,
    },
    /// Selling would refund at least the cumulative spend.
    #[error("sell value of {percent}% must stay below the cumulative spend")]
    SellValueNotBelowSpend {
        /// Configured sell percentage.
        percent: u32,
    },
}

/// Converts seconds into a duration, mapping negative or non-finite input to zero.
#[must_use]
pub fn duration_from_secs(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO)
}

fn percent_of(value: u32, percent: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field })
    }
}
