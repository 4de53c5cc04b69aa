//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits in [`crate::ports`]:
//! adapters depend on ports, never the other way around.

pub mod in_memory_store;
pub mod recorded;
pub mod text_weight_store;

pub use in_memory_store::InMemoryWeightStore;
pub use recorded::{Frame, IssuedCommand, RecordedBattle, RecordedEpisode, ReplayEngine};
pub use text_weight_store::{BEST_WEIGHTS_FILE, TextWeightStore, WEIGHTS_FILE};
