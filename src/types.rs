//! Value types shared by the controller and its collaborators.

use serde::{Deserialize, Serialize};

pub use crate::identifiers::{Side, UnitId};

/// A grid cell, addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance: the larger of the row and column offsets.
    ///
    /// Matches the cost of 8-directional movement on the grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use skirmish::types::Position;
    ///
    /// let a = Position::new(0, 0);
    /// let b = Position::new(3, -5);
    /// assert_eq!(a.chebyshev(&b), 5);
    /// assert_eq!(b.chebyshev(&a), 5);
    /// ```
    pub fn chebyshev(&self, other: &Position) -> u32 {
        let rows = self.row.abs_diff(other.row);
        let cols = self.col.abs_diff(other.col);
        rows.max(cols)
    }
}

/// Read-only view of a unit as reported by the world snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub side: Side,
    /// Template name, e.g. `footman`.
    pub kind: String,
    pub position: Position,
    pub health: i32,
}

/// A "targeted attack" command: `unit` attacks `target`.
///
/// This is the only action shape the controller issues or inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackCommand {
    pub unit: UnitId,
    pub target: UnitId,
}

impl AttackCommand {
    pub const fn new(unit: UnitId, target: UnitId) -> Self {
        Self { unit, target }
    }
}

/// Engine feedback on a previously issued command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Completed,
    Failed,
    InProgress,
}

/// Feedback for one command issued on a past tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub command: AttackCommand,
    pub outcome: ActionOutcome,
}

impl ActionReport {
    pub const fn new(command: AttackCommand, outcome: ActionOutcome) -> Self {
        Self { command, outcome }
    }

    /// Anything not yet completed still counts as in flight, `Failed`
    /// included. A failed attack's target stays claimed for the features
    /// computed on the tick that reads the report.
    pub fn is_in_flight(&self) -> bool {
        self.outcome != ActionOutcome::Completed
    }
}

/// A unit removed from play on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathEvent {
    pub unit: UnitId,
    pub side: Side,
}

/// Damage dealt by one unit to another on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub attacker: UnitId,
    pub attacker_side: Side,
    pub defender: UnitId,
    pub defender_side: Side,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chebyshev_identity_is_zero() {
        let p = Position::new(4, -2);
        assert_eq!(p.chebyshev(&p), 0);
    }

    #[test]
    fn test_chebyshev_is_symmetric() {
        let points = [
            Position::new(0, 0),
            Position::new(1, 7),
            Position::new(-3, 2),
            Position::new(9, 9),
        ];
        for a in &points {
            for b in &points {
                assert_eq!(a.chebyshev(b), b.chebyshev(a));
            }
        }
    }

    #[test]
    fn test_chebyshev_takes_larger_offset() {
        assert_eq!(Position::new(0, 0).chebyshev(&Position::new(2, 1)), 2);
        assert_eq!(Position::new(0, 0).chebyshev(&Position::new(1, 6)), 6);
    }

    #[test]
    fn test_in_flight_excludes_completed() {
        let cmd = AttackCommand::new(UnitId::new(1), UnitId::new(2));
        assert!(!ActionReport::new(cmd, ActionOutcome::Completed).is_in_flight());
        assert!(ActionReport::new(cmd, ActionOutcome::InProgress).is_in_flight());
        assert!(ActionReport::new(cmd, ActionOutcome::Failed).is_in_flight());
    }
}
