//! Presentation callbacks invoked as the simulation reports events.

use glam::Vec2;

use corridor_defence_core::{AdversaryKind, CommandError, DefenderSnapshot};

/// Callbacks a presentation collaborator implements to react to the run.
///
/// Every method defaults to a no-op. Hooks fire synchronously from
/// [`Simulation::update`](crate::Simulation::update) and the command methods,
/// after the world has applied the corresponding mutation.
pub trait SimulationHooks {
    /// A defender was constructed.
    fn on_build_success(&mut self, _defender: &DefenderSnapshot) {}

    /// A placement request was rejected by the world.
    fn on_build_failure(&mut self, _reason: CommandError) {}

    /// An adversary was destroyed at `position`; `boss` marks wave bosses.
    fn on_adversary_killed(&mut self, _position: Vec2, _kind: AdversaryKind, _boss: bool) {}

    /// An adversary reached the base and cost a life.
    fn on_adversary_leaked(&mut self) {}

    /// A wave was cleared and its bonus credited.
    fn on_wave_cleared(&mut self, _wave: u32, _bonus: u32) {}

    /// The last life was lost.
    fn on_game_over(&mut self, _final_wave: u32) {}
}

/// Hooks implementation that ignores every callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopHooks;

impl SimulationHooks for NoopHooks {}
