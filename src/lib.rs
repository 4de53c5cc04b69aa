//! Linear Q-learning target selection for melee squads
//!
//! This crate provides:
//! - Feature extraction for (attacker, candidate target) pairs
//! - A linear Q-function with semi-gradient TD(0) updates
//! - ε-greedy target selection over live enemies
//! - A tick-driven training loop with testing/evaluation phases, reward
//!   bookkeeping and weight persistence
//! - A recorded-battle replay engine and CLI to drive training offline

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod identifiers;
pub mod logging;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use app::{App, ControllerConfig, Pretrained};
pub use error::{Error, Result};
pub use pipeline::{TrainingLoop, TrainingRun, TrainingState};
pub use q_learning::{FeatureVector, LinearQFunction, WeightVector};
pub use types::{AttackCommand, Side, UnitId};
