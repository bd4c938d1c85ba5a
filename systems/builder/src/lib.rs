#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for the player's selection and the
//! placement, upgrade, and sale commands derived from it.

use corridor_defence_core::{CellCoord, Command, CommandError, DefenderId, DefenderKind, Event};

/// Player selection tracked between frames.
///
/// At most one of the two fields is set: choosing a build type drops the
/// selected defender and selecting a defender drops the build type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Defender kind the next build request constructs.
    pub build_kind: Option<DefenderKind>,
    /// Existing defender targeted by upgrade and sale requests.
    pub defender: Option<DefenderId>,
}

/// Builder system that translates selection state into world commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    selection: Selection,
}

impl Builder {
    /// Creates a new builder system instance with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection: Selection {
                build_kind: None,
                defender: None,
            },
        }
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Selects the build type, or clears it when the same type is already selected.
    ///
    /// Returns the build type selected afterwards.
    pub fn select_build_type(&mut self, kind: DefenderKind) -> Option<DefenderKind> {
        self.selection.build_kind = if self.selection.build_kind == Some(kind) {
            None
        } else {
            Some(kind)
        };
        self.selection.defender = None;
        self.selection.build_kind
    }

    /// Clears the whole selection.
    pub fn deselect(&mut self) {
        self.selection = Selection::default();
    }

    /// Selects the defender standing on `cell`, clearing the build type.
    ///
    /// The `defender_at` closure should mirror the semantics of the world's
    /// `query::defender_at` helper. Selecting a tile without a defender clears
    /// the defender selection.
    pub fn select_defender_at<F>(&mut self, cell: CellCoord, defender_at: F) -> Option<DefenderId>
    where
        F: FnOnce(CellCoord) -> Option<DefenderId>,
    {
        self.selection.defender = defender_at(cell);
        if self.selection.defender.is_some() {
            self.selection.build_kind = None;
        }
        self.selection.defender
    }

    /// Produces the placement command for the selected build type.
    pub fn build_command(&self, cell: CellCoord) -> Result<Command, CommandError> {
        let kind = self
            .selection
            .build_kind
            .ok_or(CommandError::NoBuildTypeSelected)?;
        Ok(Command::PlaceDefender { kind, cell })
    }

    /// Produces the upgrade command for the selected defender.
    pub fn upgrade_command(&self) -> Result<Command, CommandError> {
        let defender = self.selection.defender.ok_or(CommandError::NoSelection)?;
        Ok(Command::UpgradeDefender { defender })
    }

    /// Produces the sale command for the selected defender.
    pub fn sell_command(&self) -> Result<Command, CommandError> {
        let defender = self.selection.defender.ok_or(CommandError::NoSelection)?;
        Ok(Command::SellDefender { defender })
    }

    /// Consumes world events, dropping selections that no longer resolve.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::DefenderSold { defender, .. }
                    if self.selection.defender == Some(*defender) =>
                {
                    self.selection.defender = None;
                }
                Event::RunReset => self.deselect(),
                _ => {}
            }
        }
    }
}
