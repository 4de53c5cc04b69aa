//! Application layer with dependency injection container.
//!
//! ```text
//! App ──owns──▶ WeightStore adapter (TextWeightStore / InMemoryWeightStore)
//!  │
//!  └─creates──▶ TrainingLoop (pipeline) ──uses──▶ ports
//! ```

pub mod config;
pub mod container;

pub use config::{ControllerConfig, Pretrained};
pub use container::{App, AppBuilder, SharedWeightStore};
