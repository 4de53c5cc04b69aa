//! History port - events recorded by the engine on past ticks.

use crate::types::{ActionReport, DamageEvent, DeathEvent, Side};

/// Per-tick event log of the current episode.
///
/// Only past ticks may be queried. The training loop never asks for
/// events on the first tick of an episode, when no tick has elapsed yet.
pub trait EventHistory {
    /// Units that died during `turn`.
    fn deaths(&self, turn: u64) -> Vec<DeathEvent>;

    /// Damage dealt during `turn`.
    fn damage(&self, turn: u64) -> Vec<DamageEvent>;

    /// Feedback for the commands `side` had running during `turn`.
    fn action_feedback(&self, side: Side, turn: u64) -> Vec<ActionReport>;
}
