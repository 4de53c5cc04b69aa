//! Observer port - abstraction for training observation and reporting
//!
//! Observers receive the training loop's report payloads and decide how to
//! present them (console table, progress bar, metrics), without the loop
//! knowing about any output format.

use crate::{
    Result,
    pipeline::{
        report::{EpisodeSummary, EvaluationReport, RunSummary},
        schedule::EpisodePhase,
    },
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_run_start(total_episodes)` - once, from the driver
/// 2. For each episode:
///    - `on_episode_start(episode, phase)`
///    - `on_learning_event(episode, turn, reward)` - per learning tick
///    - `on_evaluation_report(report)` - when an evaluation window fills
///    - `on_episode_end(summary)`
/// 3. `on_run_end(summary)` - once, from the driver
///
/// All methods default to no-ops. Reporting is best-effort: an `Err` is
/// logged by the training loop and never stops the run.
///
/// # Examples
///
/// ```
/// use skirmish::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct RewardLog(Vec<f64>);
///
/// impl Observer for RewardLog {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> skirmish::Result<()> {
///         self.0.push(summary.reward);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    fn on_run_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// `episode` is 1-based.
    fn on_episode_start(&mut self, _episode: usize, _phase: EpisodePhase) -> Result<()> {
        Ok(())
    }

    /// `reward` is the team reward recorded for this tick.
    fn on_learning_event(&mut self, _episode: usize, _turn: u64, _reward: f64) -> Result<()> {
        Ok(())
    }

    fn on_evaluation_report(&mut self, _report: &EvaluationReport) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}
