//! Training pipeline
//!
//! - [`training`]: the per-episode state machine driven tick by tick
//! - [`driver`]: runs that state machine over an engine and episode budget
//! - [`rewards`], [`roster`], [`schedule`]: bookkeeping the loop relies on
//! - [`report`], [`observers`]: report payloads and their presentation

pub mod driver;
pub mod observers;
pub mod report;
pub mod rewards;
pub mod roster;
pub mod schedule;
pub mod training;

pub use driver::{DEFAULT_RESULTS_PATH, TrainingRun};
pub use observers::{
    ConsoleReportObserver, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};
pub use report::{
    CSV_HEADER, EpisodeSummary, EvaluationReport, RunSummary, read_reward_csv,
};
pub use rewards::{RewardConfig, RewardLedger, RewardScope, unit_reward};
pub use roster::Roster;
pub use schedule::{EpisodePhase, PhaseSchedule, PhaseTracker};
pub use training::{BestWeightsRecord, TickReport, TrainingLoop, TrainingState};

pub use crate::ports::Observer;
