#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting wave and spawn commands.

use std::time::Duration;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use corridor_defence_core::{AdversaryKind, Command, Event, WaveConfig, WavePhase};

/// Read-only facts about the run the scheduler needs on every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveProgress {
    /// One-based number of the current wave as tracked by the world.
    pub wave: u32,
    /// Number of adversaries still alive in the corridor.
    pub live_adversaries: usize,
}

/// Pure system that walks the wave state machine and emits spawn commands.
///
/// The scheduler starts in [`WavePhase::Intermission`] with an elapsed timer so
/// the first wave begins on the first tick. A wave is cleared once its spawn
/// budget is exhausted and no adversary is alive; the following tick enters the
/// intermission before the next wave starts.
#[derive(Debug)]
pub struct Spawning {
    tuning: WaveConfig,
    rng: ChaCha8Rng,
    phase: WavePhase,
    timer: Duration,
    remaining: u32,
}

impl Spawning {
    /// Creates a new scheduler seeded from the wave tuning.
    #[must_use]
    pub fn new(tuning: WaveConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(tuning.seed),
            tuning,
            phase: WavePhase::Intermission,
            timer: Duration::ZERO,
            remaining: 0,
        }
    }

    /// Current phase of the wave state machine.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Adversaries still to be spawned during the current wave.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consumes world events and advances the schedule by `dt`.
    pub fn handle(
        &mut self,
        events: &[Event],
        dt: Duration,
        progress: WaveProgress,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::RunReset => self.reset(),
                Event::GameOver { .. } => self.phase = WavePhase::GameOver,
                _ => {}
            }
        }

        match self.phase {
            WavePhase::GameOver => {}
            WavePhase::WaveCleared => {
                self.phase = WavePhase::Intermission;
                self.timer = self.tuning.intermission();
            }
            WavePhase::Intermission => {
                self.timer = self.timer.saturating_sub(dt);
                if self.timer.is_zero() {
                    self.start_wave(progress.wave, out);
                }
            }
            WavePhase::Spawning => {
                if self.remaining == 0 && progress.live_adversaries == 0 {
                    self.phase = WavePhase::WaveCleared;
                    out.push(Command::CompleteWave {
                        bonus: self.tuning.clear_bonus(progress.wave),
                    });
                    return;
                }

                self.timer = self.timer.saturating_sub(dt);
                if self.timer.is_zero() && self.remaining > 0 {
                    self.remaining -= 1;
                    self.timer = self.tuning.spawn_interval(progress.wave);
                    let kind = self.roll_kind(progress.wave);
                    out.push(Command::SpawnAdversary {
                        kind,
                        boss: self.tuning.is_boss_wave(progress.wave),
                    });
                }
            }
        }
    }

    fn start_wave(&mut self, wave: u32, out: &mut Vec<Command>) {
        let spawn_budget = self.tuning.spawn_budget(wave);
        debug!("scheduling wave {wave}: {spawn_budget} adversaries");
        self.phase = WavePhase::Spawning;
        self.remaining = spawn_budget;
        self.timer = self.tuning.lead_in();
        out.push(Command::StartWave { spawn_budget });
    }

    /// Rolls the variant; boss waves roll too and scale the result instead.
    fn roll_kind(&mut self, wave: u32) -> AdversaryKind {
        let roll: f32 = self.rng.gen();
        if wave > self.tuning.fast_unlock_wave && roll < self.tuning.fast_chance {
            AdversaryKind::Fast
        } else if wave > self.tuning.tank_unlock_wave && roll > 1.0 - self.tuning.tank_chance {
            AdversaryKind::Tank
        } else {
            AdversaryKind::Normal
        }
    }

    /// Returns the scheduler to its initial phase. The variant roll keeps its stream.
    pub fn reset(&mut self) {
        self.phase = WavePhase::Intermission;
        self.timer = Duration::ZERO;
        self.remaining = 0;
    }
}
