//! Engine port - the driver's view of a running simulation.
//!
//! The training loop itself never touches this trait; only the
//! caller-owned driver in [`crate::pipeline::driver`] does.

use crate::{
    Result,
    ports::{EventHistory, WorldSnapshot},
    types::AttackCommand,
};

/// A simulation that can be stepped one tick at a time.
pub trait Engine {
    type World: WorldSnapshot;
    type History: EventHistory;

    /// Reset to the initial placement of the next episode.
    fn begin_episode(&mut self) -> Result<()>;

    /// Current world snapshot.
    fn world(&self) -> &Self::World;

    /// Event history of the running episode.
    fn history(&self) -> &Self::History;

    /// Whether one side has been eliminated.
    fn is_over(&self) -> bool;

    /// Execute the commands issued this tick and advance to the next one.
    fn advance(&mut self, commands: &[AttackCommand]) -> Result<()>;
}
