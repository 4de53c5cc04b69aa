//! Ports (trait boundaries) for external collaborators.
//!
//! The controller only ever talks to the simulation, the weight store and
//! the reporting layer through these traits. Adapters live in
//! [`crate::adapters`].

pub mod engine;
pub mod history;
pub mod observer;
pub mod repository;
pub mod sink;
pub mod world;

pub use engine::Engine;
pub use history::EventHistory;
pub use observer::Observer;
pub use repository::WeightStore;
pub use sink::ActionSink;
pub use world::WorldSnapshot;
