//! Observer implementations for training runs
//!
//! Observers allow composable reporting during training without coupling
//! the training loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    pipeline::{
        report::{EpisodeSummary, EvaluationReport, RunSummary},
        schedule::EpisodePhase,
    },
    ports::Observer,
};

/// Console observer - prints the learning-curve table after every
/// evaluation window and the won fraction at the end of the run.
#[derive(Debug, Default)]
pub struct ConsoleReportObserver;

impl ConsoleReportObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for ConsoleReportObserver {
    fn on_evaluation_report(&mut self, report: &EvaluationReport) -> Result<()> {
        print!("{}", report.render());
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        println!();
        println!(
            "Finished {} episodes, won {:.6} of games",
            summary.episodes_played(),
            summary.win_rate()
        );
        Ok(())
    }
}

/// Progress bar observer - shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} L:{}", self.wins, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if summary.won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - tracks per-phase reward and win statistics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: usize,
    wins: usize,
    learning_events: usize,
    testing_rewards: Vec<f64>,
    evaluation_rewards: Vec<f64>,
    reports: usize,
    best_reports: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            wins: self.wins,
            win_rate: self.win_rate(),
            learning_events: self.learning_events,
            mean_testing_reward: mean(&self.testing_rewards),
            mean_evaluation_reward: mean(&self.evaluation_rewards),
            evaluation_reports: self.reports,
            new_best_reports: self.best_reports,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub learning_events: usize,
    pub mean_testing_reward: Option<f64>,
    pub mean_evaluation_reward: Option<f64>,
    pub evaluation_reports: usize,
    pub new_best_reports: usize,
}

impl Observer for MetricsObserver {
    fn on_learning_event(&mut self, _episode: usize, _turn: u64, _reward: f64) -> Result<()> {
        self.learning_events += 1;
        Ok(())
    }

    fn on_evaluation_report(&mut self, report: &EvaluationReport) -> Result<()> {
        self.reports += 1;
        if report.new_best {
            self.best_reports += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        if summary.won {
            self.wins += 1;
        }
        match summary.phase {
            EpisodePhase::Testing => self.testing_rewards.push(summary.reward),
            EpisodePhase::Evaluating => self.evaluation_rewards.push(summary.reward),
        }
        Ok(())
    }
}

/// JSONL observer - writes one episode summary per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
