//! Report payloads emitted by the training loop

use std::{
    fmt::Write as _,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, pipeline::schedule::EpisodePhase, q_learning::WeightVector};

/// Header line of the run summary CSV.
pub const CSV_HEADER: &str = "iteration, cumulative reward";

/// Result of a single completed episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// 1-based episode index within the run
    pub episode: usize,
    pub phase: EpisodePhase,
    /// Sum of the episode's reward ledger
    pub reward: f64,
    /// Number of learning ticks in the episode
    pub learning_events: usize,
    /// Own side outlived the enemy side
    pub won: bool,
}

/// Emitted every time an evaluation window fills up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Rolling series of evaluation averages, oldest first
    pub averages: Vec<f64>,
    /// Games represented by one row of the table
    pub games_per_row: usize,
    /// Weights at the time of the report
    pub weights: WeightVector,
    /// Whether this window set a new best average
    pub new_best: bool,
}

impl EvaluationReport {
    /// Average of the window that triggered this report.
    pub fn latest_average(&self) -> Option<f64> {
        self.averages.last().copied()
    }

    /// `(games played, average reward)` rows of the learning-curve table.
    pub fn rows(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.averages
            .iter()
            .enumerate()
            .map(|(i, &avg)| (i * self.games_per_row, avg))
    }

    /// Render the console block: the learning-curve table followed by one
    /// line per feature weight.
    pub fn render(&self) -> String {
        let divider = "-------------     ";
        let mut out = String::new();
        out.push('\n');
        out.push_str("Games Played      Average Cumulative Reward\n");
        out.push_str("-------------     -------------------------\n");
        for (games, avg) in self.rows() {
            let games = games.to_string();
            let _ = writeln!(out, "{games:<width$}{avg:.2}", width = divider.len());
        }
        out.push('\n');
        for (feature, weight) in self.weights.named() {
            let _ = writeln!(out, "{:<17}: {weight:.6}", feature.name());
        }
        out
    }
}

/// Final payload of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Cumulative reward of every episode, in play order
    pub episode_rewards: Vec<f64>,
    pub episodes_won: usize,
    /// Rolling evaluation averages
    pub average_rewards: Vec<f64>,
    /// Best evaluation average seen, if any beat the initial best
    pub best_average: Option<f64>,
    pub final_weights: WeightVector,
}

impl RunSummary {
    pub fn episodes_played(&self) -> usize {
        self.episode_rewards.len()
    }

    /// Fraction of episodes won; `0.0` for an empty run.
    pub fn win_rate(&self) -> f64 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episodes_won as f64 / self.episode_rewards.len() as f64
        }
    }

    /// Write the per-episode reward history as CSV, overwriting `path`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create run summary {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{CSV_HEADER}")?;
        for (i, reward) in self.episode_rewards.iter().enumerate() {
            writeln!(writer, "{}, {reward:.5}", i + 1)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the summary as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a summary written by [`RunSummary::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let summary = serde_json::from_reader(file)?;
        Ok(summary)
    }
}

/// Read the `(episode, reward)` rows back from a run summary CSV.
pub fn read_reward_csv<P: AsRef<Path>>(path: P) -> Result<Vec<(usize, f64)>> {
    #[derive(Deserialize)]
    struct Row {
        iteration: usize,
        #[serde(rename = "cumulative reward")]
        reward: f64,
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: Row = record?;
        rows.push((row.iteration, row.reward));
    }
    Ok(rows)
}
