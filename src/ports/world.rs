//! World port - read-only view of the simulation state at the current tick.

use crate::types::{Side, UnitId, UnitView};

/// Snapshot of the live world, as exposed by the simulation engine.
///
/// Implementations are expected to be cheap to query; the training loop
/// calls [`WorldSnapshot::unit`] several times per candidate per tick.
pub trait WorldSnapshot {
    /// Index of the current tick within the episode (0 on the first tick).
    fn turn(&self) -> u64;

    /// Identifiers of the live units on `side`, in engine enumeration order.
    fn unit_ids(&self, side: Side) -> Vec<UnitId>;

    /// Look up a live unit. Returns `None` for dead or unknown identifiers.
    fn unit(&self, id: UnitId) -> Option<UnitView>;

    /// Number of live units on `side`.
    fn live_count(&self, side: Side) -> usize {
        self.unit_ids(side).len()
    }
}
