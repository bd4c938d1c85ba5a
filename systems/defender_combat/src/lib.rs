#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns acquired targets into projectile launches.

use corridor_defence_core::{Command, DefenderTarget, DefenderView};

/// Emits `Command::FireProjectile` for every ready defender holding a target.
///
/// Commands follow defender identifier order. Targets naming a defender that
/// is absent from the view are ignored.
pub fn fire_commands(defenders: &DefenderView, targets: &[DefenderTarget], out: &mut Vec<Command>) {
    if targets.is_empty() {
        return;
    }

    out.extend(
        defenders
            .iter()
            .filter(|defender| defender.ready())
            .filter_map(|defender| {
                targets
                    .iter()
                    .find(|target| target.defender == defender.id)
                    .map(|target| Command::FireProjectile {
                        defender: defender.id,
                        target: target.adversary,
                    })
            }),
    );
}
