//! Hooks that log presentation callbacks and tally the run.

use std::fmt;

use glam::Vec2;
use log::{debug, info, warn};

use corridor_defence_core::{AdversaryKind, CommandError, DefenderSnapshot};
use corridor_defence_simulation::{FrameSnapshot, SimulationHooks};

/// Running totals collected from simulation callbacks.
#[derive(Debug, Default)]
pub(crate) struct RunReport {
    pub(crate) builds: u32,
    pub(crate) failed_builds: u32,
    pub(crate) kills: u32,
    pub(crate) boss_kills: u32,
    pub(crate) leaks: u32,
    pub(crate) waves_cleared: u32,
    pub(crate) bonus_earned: u32,
    pub(crate) final_wave: Option<u32>,
}

impl SimulationHooks for RunReport {
    fn on_build_success(&mut self, defender: &DefenderSnapshot) {
        self.builds += 1;
        info!(
            "built {:?} at ({}, {}) for {}",
            defender.kind,
            defender.cell.column(),
            defender.cell.row(),
            defender.total_spent
        );
    }

    fn on_build_failure(&mut self, reason: CommandError) {
        self.failed_builds += 1;
        debug!("build failed: {reason}");
    }

    fn on_adversary_killed(&mut self, position: Vec2, kind: AdversaryKind, boss: bool) {
        self.kills += 1;
        if boss {
            self.boss_kills += 1;
            info!("{kind:?} boss destroyed at ({:.0}, {:.0})", position.x, position.y);
        } else {
            debug!("{kind:?} destroyed at ({:.0}, {:.0})", position.x, position.y);
        }
    }

    fn on_adversary_leaked(&mut self) {
        self.leaks += 1;
        debug!("adversary reached the base");
    }

    fn on_wave_cleared(&mut self, wave: u32, bonus: u32) {
        self.waves_cleared += 1;
        self.bonus_earned += bonus;
        info!("wave {wave} cleared, bonus {bonus}");
    }

    fn on_game_over(&mut self, final_wave: u32) {
        self.final_wave = Some(final_wave);
        warn!("game over on wave {final_wave}");
    }
}

/// Final summary printed once the run stops.
pub(crate) struct Summary<'a> {
    pub(crate) report: &'a RunReport,
    pub(crate) snapshot: &'a FrameSnapshot,
    pub(crate) frames: u32,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.report.final_wave {
            Some(wave) => format!("defeated on wave {wave}"),
            None => format!("still standing on wave {}", self.snapshot.wave),
        };
        writeln!(f, "run {outcome} after {} frames", self.frames)?;
        writeln!(
            f,
            "waves cleared: {} (bonus {})",
            self.report.waves_cleared, self.report.bonus_earned
        )?;
        writeln!(
            f,
            "kills: {} ({} bosses), leaks: {}",
            self.report.kills, self.report.boss_kills, self.report.leaks
        )?;
        writeln!(
            f,
            "defenders: {} built ({} rejected), {} standing",
            self.report.builds,
            self.report.failed_builds,
            self.snapshot.defenders.len()
        )?;
        write!(
            f,
            "money: {}, lives: {}",
            self.snapshot.money, self.snapshot.lives
        )
    }
}
