#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes defender targets from world snapshots.

use glam::Vec2;

use corridor_defence_core::{
    AdversaryId, AdversaryView, Command, DefenderId, DefenderTarget, DefenderView,
};

/// Defender targeting system that reuses scratch buffers to avoid repeated allocations.
///
/// A defender keeps its current target while that adversary is alive and in
/// range. Otherwise it acquires the nearest live adversary in range; equal
/// distances resolve to the adversary met first in entity-table order.
#[derive(Debug, Default)]
pub struct DefenderTargeting {
    adversary_workspace: Vec<AdversaryCandidate>,
}

impl DefenderTargeting {
    /// Creates a new defender targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes defender targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Defenders without a target in range are omitted.
    pub fn handle(
        &mut self,
        defenders: &DefenderView,
        adversaries: &AdversaryView,
        out: &mut Vec<DefenderTarget>,
    ) {
        out.clear();

        if defenders.is_empty() || adversaries.is_empty() {
            return;
        }

        self.prepare_adversary_workspace(adversaries);
        if self.adversary_workspace.is_empty() {
            return;
        }

        for defender in defenders.iter() {
            let retained = defender.target.and_then(|current| {
                self.adversary_workspace
                    .iter()
                    .find(|candidate| candidate.id == current)
                    .map(|candidate| candidate.position.distance(defender.position))
                    .filter(|distance| *distance <= defender.range)
                    .map(|distance| (current, distance))
            });

            let chosen = retained.or_else(|| {
                let mut best: Option<(AdversaryId, f32)> = None;
                for candidate in &self.adversary_workspace {
                    let distance = candidate.position.distance(defender.position);
                    if distance > defender.range {
                        continue;
                    }
                    match best {
                        Some((_, best_distance)) if best_distance <= distance => {}
                        _ => best = Some((candidate.id, distance)),
                    }
                }
                best
            });

            if let Some((adversary, _)) = chosen {
                out.push(DefenderTarget {
                    defender: defender.id,
                    adversary,
                });
            }
        }
    }

    fn prepare_adversary_workspace(&mut self, adversaries: &AdversaryView) {
        self.adversary_workspace.clear();
        self.adversary_workspace.reserve(adversaries.len());

        for snapshot in adversaries.iter() {
            if snapshot.hp <= 0.0 {
                continue;
            }
            self.adversary_workspace.push(AdversaryCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

/// Emits `Command::AssignTarget` for every defender whose held target changed.
///
/// Defenders missing from `targets` lose their target.
pub fn retarget_commands(
    defenders: &DefenderView,
    targets: &[DefenderTarget],
    out: &mut Vec<Command>,
) {
    for defender in defenders.iter() {
        let acquired = find_target(targets, defender.id).map(|target| target.adversary);
        if acquired != defender.target {
            out.push(Command::AssignTarget {
                defender: defender.id,
                target: acquired,
            });
        }
    }
}

fn find_target(targets: &[DefenderTarget], defender: DefenderId) -> Option<&DefenderTarget> {
    targets.iter().find(|target| target.defender == defender)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AdversaryCandidate {
    id: AdversaryId,
    position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_defence_core::{
        AdversaryKind, AdversarySnapshot, CellCoord, DefenderKind, DefenderSnapshot,
    };
    use std::time::Duration;

    fn defender(id: u32, position: Vec2, range: f32, target: Option<AdversaryId>) -> DefenderSnapshot {
        DefenderSnapshot {
            id: DefenderId::new(id),
            kind: DefenderKind::Basic,
            cell: CellCoord::new(0, 0),
            position,
            range,
            damage: 15.0,
            fire_interval: Duration::from_millis(800),
            cooldown: Duration::ZERO,
            level: 1,
            total_spent: 50,
            upgrade_cost: 25,
            sell_value: 35,
            target,
        }
    }

    fn adversary(index: u32, position: Vec2, hp: f32) -> AdversarySnapshot {
        AdversarySnapshot {
            id: AdversaryId::new(index, 0),
            kind: AdversaryKind::Normal,
            boss: false,
            position,
            hp,
            max_hp: 30.0,
            radius: 14.0,
            slowed: false,
            waypoint_index: 1,
        }
    }

    fn views(
        defenders: Vec<DefenderSnapshot>,
        adversaries: Vec<AdversarySnapshot>,
    ) -> (DefenderView, AdversaryView) {
        (
            DefenderView::from_snapshots(defenders),
            AdversaryView::from_snapshots(adversaries),
        )
    }

    #[test]
    fn targets_nearest_adversary_within_range() {
        let mut system = DefenderTargeting::new();
        let (defenders, adversaries) = views(
            vec![defender(1, Vec2::ZERO, 150.0, None)],
            vec![
                adversary(0, Vec2::new(120.0, 0.0), 30.0),
                adversary(1, Vec2::new(60.0, 0.0), 30.0),
            ],
        );

        let mut out = Vec::new();
        system.handle(&defenders, &adversaries, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(
            out,
            vec![DefenderTarget {
                defender: DefenderId::new(1),
                adversary: AdversaryId::new(1, 0),
            }]
        );
    }

    #[test]
    fn adversary_outside_range_is_ignored() {
        let mut system = DefenderTargeting::new();
        let (defenders, adversaries) = views(
            vec![defender(1, Vec2::ZERO, 150.0, None)],
            vec![adversary(0, Vec2::new(151.0, 0.0), 30.0)],
        );

        let mut out = Vec::new();
        system.handle(&defenders, &adversaries, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn equal_distances_prefer_first_in_table_order() {
        let mut system = DefenderTargeting::new();
        let (defenders, adversaries) = views(
            vec![defender(1, Vec2::ZERO, 150.0, None)],
            vec![
                adversary(5, Vec2::new(0.0, 80.0), 30.0),
                adversary(2, Vec2::new(80.0, 0.0), 30.0),
            ],
        );

        let mut out = Vec::new();
        system.handle(&defenders, &adversaries, &mut out);
        assert_eq!(out[0].adversary, AdversaryId::new(5, 0));
    }

    #[test]
    fn current_target_is_kept_while_in_range() {
        let mut system = DefenderTargeting::new();
        let held = AdversaryId::new(0, 0);
        let (defenders, adversaries) = views(
            vec![defender(1, Vec2::ZERO, 150.0, Some(held))],
            vec![
                adversary(0, Vec2::new(140.0, 0.0), 30.0),
                adversary(1, Vec2::new(10.0, 0.0), 30.0),
            ],
        );

        let mut out = Vec::new();
        system.handle(&defenders, &adversaries, &mut out);
        assert_eq!(out[0].adversary, held);
    }

    #[test]
    fn stale_target_is_replaced() {
        let mut system = DefenderTargeting::new();
        let stale = AdversaryId::new(0, 3);
        let (defenders, adversaries) = views(
            vec![defender(1, Vec2::ZERO, 150.0, Some(stale))],
            vec![adversary(0, Vec2::new(40.0, 0.0), 30.0)],
        );

        let mut out = Vec::new();
        system.handle(&defenders, &adversaries, &mut out);
        assert_eq!(out[0].adversary, AdversaryId::new(0, 0));
    }

    #[test]
    fn destroyed_adversaries_are_never_targeted() {
        let mut system = DefenderTargeting::new();
        let (defenders, adversaries) = views(
            vec![defender(1, Vec2::ZERO, 150.0, None)],
            vec![adversary(0, Vec2::new(40.0, 0.0), 0.0)],
        );

        let mut out = vec![DefenderTarget {
            defender: DefenderId::new(9),
            adversary: AdversaryId::new(9, 9),
        }];
        system.handle(&defenders, &adversaries, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn retarget_emits_only_changes() {
        let held = AdversaryId::new(0, 0);
        let defenders = DefenderView::from_snapshots(vec![
            defender(1, Vec2::ZERO, 150.0, Some(held)),
            defender(2, Vec2::ZERO, 150.0, None),
            defender(3, Vec2::ZERO, 150.0, Some(held)),
        ]);
        let targets = vec![
            DefenderTarget {
                defender: DefenderId::new(1),
                adversary: held,
            },
            DefenderTarget {
                defender: DefenderId::new(2),
                adversary: held,
            },
        ];

        let mut out = Vec::new();
        retarget_commands(&defenders, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AssignTarget {
                    defender: DefenderId::new(2),
                    target: Some(held),
                },
                Command::AssignTarget {
                    defender: DefenderId::new(3),
                    target: None,
                },
            ]
        );
    }
}
