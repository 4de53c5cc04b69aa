//! Train command - run the controller over a recorded battle

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    adapters::{ReplayEngine, TextWeightStore, text_weight_store::DEFAULT_WEIGHTS_DIR},
    app::{App, ControllerConfig, Pretrained},
    cli::output::print_run_summary,
    pipeline::{
        ConsoleReportObserver, DEFAULT_RESULTS_PATH, JsonlObserver, PhaseSchedule,
        ProgressObserver, RewardScope, RunSummary, TrainingRun,
    },
};

/// Which stored weights to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoadArg {
    None,
    Latest,
    Best,
}

impl From<LoadArg> for Pretrained {
    fn from(arg: LoadArg) -> Self {
        match arg {
            LoadArg::None => Pretrained::None,
            LoadArg::Latest => Pretrained::Latest,
            LoadArg::Best => Pretrained::Best,
        }
    }
}

/// Which units are credited on a learning tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    Survivors,
    PreviousRoster,
}

impl From<ScopeArg> for RewardScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Survivors => RewardScope::Survivors,
            ScopeArg::PreviousRoster => RewardScope::PreviousRoster,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the controller on a recorded battle")]
pub struct TrainArgs {
    /// Recorded battle (JSON) to replay
    pub recording: PathBuf,

    /// Number of episodes to play
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Controller configuration file (JSON); flags override it
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Start from stored weights
    #[arg(long, value_enum)]
    pub load: Option<LoadArg>,

    /// Directory holding weights.txt and bestweights.data
    #[arg(long, default_value = DEFAULT_WEIGHTS_DIR)]
    pub weights_dir: PathBuf,

    /// Per-episode reward CSV
    #[arg(long, default_value = DEFAULT_RESULTS_PATH)]
    pub results: PathBuf,

    /// Do not write the reward CSV
    #[arg(long, default_value_t = false)]
    pub no_results: bool,

    /// Optional path for writing a JSON run summary
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional JSONL file with one line per episode
    #[arg(long)]
    pub episode_log: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Exploration probability
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Learning rate (alpha)
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor (gamma)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Testing episodes per phase block
    #[arg(long)]
    pub testing_episodes: Option<usize>,

    /// Evaluation episodes per phase block
    #[arg(long)]
    pub evaluation_episodes: Option<usize>,

    /// Which units are credited on a learning tick
    #[arg(long, value_enum)]
    pub reward_scope: Option<ScopeArg>,

    /// Unit kind making up the rosters
    #[arg(long)]
    pub squad_kind: Option<String>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Skip the learning-curve tables and final summary
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

impl TrainArgs {
    /// Resolve the controller configuration: file (or defaults), then flags.
    pub fn controller_config(&self) -> Result<ControllerConfig> {
        let mut config = match &self.config {
            Some(path) => ControllerConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ControllerConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(load) = self.load {
            config.pretrained = load.into();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(rate) = self.learning_rate {
            config.learning_rate = rate;
        }
        if let Some(discount) = self.discount {
            config.discount = discount;
        }
        if self.testing_episodes.is_some() || self.evaluation_episodes.is_some() {
            config.schedule = PhaseSchedule::new(
                self.testing_episodes
                    .unwrap_or(config.schedule.testing_episodes),
                self.evaluation_episodes
                    .unwrap_or(config.schedule.evaluation_episodes),
            );
        }
        if let Some(scope) = self.reward_scope {
            config.reward_scope = scope.into();
        }
        if let Some(kind) = &self.squad_kind {
            config.squad_kind = kind.clone();
        }

        config.validate().context("Invalid controller configuration")?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    run(&args).map(|summary| {
        if !args.quiet {
            print_run_summary(&summary);
        }
    })
}

/// Run training and return the summary without printing it.
pub fn run(args: &TrainArgs) -> Result<RunSummary> {
    let config = args.controller_config()?;
    let episodes = config.episodes;

    let mut engine = ReplayEngine::from_json_file(&args.recording).with_context(|| {
        format!("Failed to load recording from {}", args.recording.display())
    })?;

    let app = App::builder()
        .with_store(TextWeightStore::in_dir(&args.weights_dir))
        .build();
    let mut controller = app.create_controller(config)?;

    if !args.no_progress {
        controller = controller.with_observer(Box::new(ProgressObserver::new()));
    }
    if !args.quiet {
        controller = controller.with_observer(Box::new(ConsoleReportObserver::new()));
    }
    if let Some(path) = &args.episode_log {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create episode log {}", path.display()))?;
        controller = controller.with_observer(Box::new(observer));
    }

    let mut training = TrainingRun::new(episodes)
        .with_results_path((!args.no_results).then(|| args.results.clone()));
    if let Some(path) = &args.summary {
        training = training.with_summary_path(path);
    }

    let summary = training
        .run(&mut controller, &mut engine)
        .context("Training run failed")?;
    Ok(summary)
}
