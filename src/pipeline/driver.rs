//! Caller-owned driver that runs a training loop over an episode budget.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    Result,
    pipeline::{
        report::RunSummary,
        training::{TrainingLoop, TrainingState},
    },
    ports::{Engine, WeightStore},
    q_learning::RandomSource,
    types::AttackCommand,
};

/// Default location of the per-episode reward CSV.
pub const DEFAULT_RESULTS_PATH: &str = "results.csv";

/// Runs `episodes` episodes of an [`Engine`] through a [`TrainingLoop`].
#[derive(Debug, Clone)]
pub struct TrainingRun {
    episodes: usize,
    results_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
}

impl TrainingRun {
    pub fn new(episodes: usize) -> Self {
        Self {
            episodes,
            results_path: Some(PathBuf::from(DEFAULT_RESULTS_PATH)),
            summary_path: None,
        }
    }

    /// Where to write the reward CSV; `None` disables it.
    pub fn with_results_path(mut self, path: Option<PathBuf>) -> Self {
        self.results_path = path;
        self
    }

    /// Also write the run summary as JSON.
    pub fn with_summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Play the whole budget with a fresh state from
    /// [`TrainingLoop::initial_state`].
    pub fn run<E, S, R>(
        &self,
        controller: &mut TrainingLoop<S, R>,
        engine: &mut E,
    ) -> Result<RunSummary>
    where
        E: Engine,
        S: WeightStore,
        R: RandomSource,
    {
        let mut state = controller.initial_state();
        self.run_with_state(controller, engine, &mut state)
    }

    /// Play the whole budget continuing from `state`.
    pub fn run_with_state<E, S, R>(
        &self,
        controller: &mut TrainingLoop<S, R>,
        engine: &mut E,
        state: &mut TrainingState,
    ) -> Result<RunSummary>
    where
        E: Engine,
        S: WeightStore,
        R: RandomSource,
    {
        let episodes = self.episodes;
        controller.notify("run_start", |observer| observer.on_run_start(episodes));

        let mut commands: Vec<AttackCommand> = Vec::new();
        for _ in 0..self.episodes {
            engine.begin_episode()?;
            controller.on_episode_start(state, engine.world())?;

            while !engine.is_over() {
                commands.clear();
                controller.on_tick(state, engine.world(), engine.history(), &mut commands)?;
                engine.advance(&commands)?;
            }

            controller.on_episode_end(state, engine.world())?;
        }

        let summary = controller.finish(state);
        info!(
            episodes = summary.episodes_played(),
            won = summary.episodes_won,
            "training run finished"
        );

        if let Some(path) = &self.results_path {
            persist("reward CSV", path, |p| summary.write_csv(p));
        }
        if let Some(path) = &self.summary_path {
            persist("run summary", path, |p| summary.save_json(p));
        }

        controller.notify("run_end", |observer| observer.on_run_end(&summary));
        Ok(summary)
    }
}

fn persist(what: &str, path: &Path, write: impl FnOnce(&Path) -> Result<()>) {
    if let Err(err) = write(path) {
        warn!(error = %err, path = %path.display(), "failed to write {what}");
    }
}
