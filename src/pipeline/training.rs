//! Training loop: the per-episode state machine
//!
//! The loop is driven from outside through three entry points,
//! [`TrainingLoop::on_episode_start`], [`TrainingLoop::on_tick`] and
//! [`TrainingLoop::on_episode_end`]. All mutable bookkeeping lives in an
//! explicit [`TrainingState`] that the caller threads through every call.

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    app::{ControllerConfig, Pretrained},
    pipeline::{
        report::{EpisodeSummary, EvaluationReport, RunSummary},
        rewards::{RewardLedger, RewardScope, unit_reward},
        roster::Roster,
        schedule::{EpisodePhase, PhaseTracker},
    },
    ports::{ActionSink, EventHistory, Observer, WeightStore, WorldSnapshot},
    q_learning::{
        EpsilonGreedy, FEATURE_COUNT, FeatureContext, FeatureExtractor, FeatureVector,
        LinearQFunction, RandomSource, WeightVector,
    },
    types::{ActionOutcome, AttackCommand, Side, UnitId},
};

/// Best evaluation average seen so far and the weights that earned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestWeightsRecord {
    pub average: f64,
    pub weights: Option<WeightVector>,
}

impl Default for BestWeightsRecord {
    fn default() -> Self {
        Self {
            average: 0.0,
            weights: None,
        }
    }
}

/// Everything the loop mutates during a run.
#[derive(Debug, Clone)]
pub struct TrainingState {
    q: LinearQFunction,
    phase: PhaseTracker,
    roster: Roster,
    /// Features behind each own unit's running action
    pending: HashMap<UnitId, FeatureVector>,
    /// Attacks still running at the end of the previous tick
    in_flight: Vec<AttackCommand>,
    ledger: RewardLedger,
    ticks_in_episode: u64,
    episodes_won: usize,
    episode_rewards: Vec<f64>,
    evaluation_window: Vec<f64>,
    average_rewards: Vec<f64>,
    best: BestWeightsRecord,
}

impl TrainingState {
    pub fn new(q: LinearQFunction) -> Self {
        Self {
            q,
            phase: PhaseTracker::new(),
            roster: Roster::default(),
            pending: HashMap::new(),
            in_flight: Vec::new(),
            ledger: RewardLedger::new(),
            ticks_in_episode: 0,
            episodes_won: 0,
            episode_rewards: Vec::new(),
            evaluation_window: Vec::new(),
            average_rewards: Vec::new(),
            best: BestWeightsRecord::default(),
        }
    }

    pub fn q_function(&self) -> &LinearQFunction {
        &self.q
    }

    pub fn weights(&self) -> &WeightVector {
        self.q.weights()
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase.phase()
    }

    pub fn phase_tracker(&self) -> &PhaseTracker {
        &self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn pending_features(&self, unit: UnitId) -> Option<&FeatureVector> {
        self.pending.get(&unit)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight(&self) -> &[AttackCommand] {
        &self.in_flight
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    pub fn episodes_completed(&self) -> usize {
        self.episode_rewards.len()
    }

    pub fn episodes_won(&self) -> usize {
        self.episodes_won
    }

    pub fn episode_rewards(&self) -> &[f64] {
        &self.episode_rewards
    }

    pub fn evaluation_window(&self) -> &[f64] {
        &self.evaluation_window
    }

    pub fn average_rewards(&self) -> &[f64] {
        &self.average_rewards
    }

    pub fn best(&self) -> &BestWeightsRecord {
        &self.best
    }

    /// 1-based index of the episode being played.
    pub fn current_episode(&self) -> usize {
        self.episode_rewards.len() + 1
    }
}

/// What happened on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub turn: u64,
    pub learning_event: bool,
    /// Team reward recorded on a learning tick
    pub reward: Option<f64>,
    /// Weight updates applied
    pub updates: usize,
    /// Commands sent to the sink
    pub commands: usize,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning controller for one squad.
pub struct TrainingLoop<S, R = StdRng> {
    config: ControllerConfig,
    extractor: FeatureExtractor,
    policy: EpsilonGreedy,
    store: S,
    rng: R,
    observers: Vec<Box<dyn Observer>>,
}

impl<S: WeightStore> TrainingLoop<S, StdRng> {
    /// Create a loop whose random source is seeded from `config.seed`
    /// (or from entropy when unset).
    pub fn seeded(config: ControllerConfig, store: S) -> Result<Self> {
        let rng = build_rng(config.seed);
        Self::new(config, store, rng)
    }
}

impl<S: WeightStore, R: RandomSource> TrainingLoop<S, R> {
    /// Create a new training loop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(config: ControllerConfig, store: S, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: FeatureExtractor::new(config.feature_bias),
            policy: EpsilonGreedy::new(config.epsilon),
            config,
            store,
            rng,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Deliver one callback to every observer. Reporting is best-effort:
    /// a failing observer is logged and the remaining observers still run.
    pub(crate) fn notify(
        &mut self,
        event: &'static str,
        mut call: impl FnMut(&mut dyn Observer) -> Result<()>,
    ) {
        for observer in &mut self.observers {
            if let Err(err) = call(observer.as_mut()) {
                warn!(error = %err, event, "observer failed; continuing");
            }
        }
    }

    /// Fresh state for a run: pretrained weights if configured and
    /// available, otherwise uniform random weights in `[-1, 1)`.
    pub fn initial_state(&mut self) -> TrainingState {
        let weights = self
            .load_pretrained()
            .unwrap_or_else(|| WeightVector::random(FEATURE_COUNT, &mut self.rng));
        TrainingState::new(LinearQFunction::new(
            weights,
            self.config.learning_rate,
            self.config.discount,
        ))
    }

    fn load_pretrained(&self) -> Option<WeightVector> {
        let loaded = match self.config.pretrained {
            Pretrained::None => return None,
            Pretrained::Latest => self.store.load(),
            Pretrained::Best => self.store.load_best(),
        };
        match loaded {
            Ok(Some(weights)) if weights.len() == FEATURE_COUNT => {
                info!(source = self.config.pretrained.label(), "loaded pretrained weights");
                Some(weights)
            }
            Ok(Some(weights)) => {
                warn!(
                    expected = FEATURE_COUNT,
                    found = weights.len(),
                    "ignoring pretrained weights of the wrong length"
                );
                None
            }
            Ok(None) => {
                info!(
                    source = self.config.pretrained.label(),
                    "no pretrained weights stored; starting from random weights"
                );
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to load pretrained weights; starting from random weights");
                None
            }
        }
    }

    /// Start an episode: snapshot rosters and clear per-episode state.
    pub fn on_episode_start(
        &mut self,
        state: &mut TrainingState,
        world: &dyn WorldSnapshot,
    ) -> Result<()> {
        state.roster = Roster::from_world(world, &self.config.squad_kind);
        state.ledger.clear();
        state.pending.clear();
        state.in_flight.clear();
        state.ticks_in_episode = 0;

        debug!(
            episode = state.current_episode(),
            phase = state.phase().label(),
            own = state.roster.own().len(),
            enemies = state.roster.enemies().len(),
            "episode started"
        );

        let episode = state.current_episode();
        let phase = state.phase();
        self.notify("episode_start", |observer| {
            observer.on_episode_start(episode, phase)
        });
        Ok(())
    }

    /// Process one decision tick and issue commands to `sink`.
    ///
    /// History is only consulted from the second tick of an episode on.
    pub fn on_tick(
        &mut self,
        state: &mut TrainingState,
        world: &dyn WorldSnapshot,
        history: &dyn EventHistory,
        sink: &mut dyn ActionSink,
    ) -> Result<TickReport> {
        let turn = world.turn();
        let first_tick = state.ticks_in_episode == 0;
        state.ticks_in_episode += 1;

        if first_tick {
            let own = state.roster.own().to_vec();
            let commands = self.issue_actions(state, world, &own, sink)?;
            return Ok(TickReport {
                turn,
                learning_event: false,
                reward: None,
                updates: 0,
                commands,
            });
        }

        let last = turn.saturating_sub(1);
        let deaths = history.deaths(last);
        let damage = history.damage(last);

        let previous_own = state.roster.own().to_vec();
        state.roster.apply_deaths(&deaths);
        let own = state.roster.own().to_vec();
        state.pending.retain(|unit, _| own.contains(unit));

        state.in_flight = [Side::Own, Side::Enemy]
            .into_iter()
            .flat_map(|side| history.action_feedback(side, last))
            .filter(|report| report.is_in_flight())
            .map(|report| report.command)
            .collect();

        let learning_event =
            !deaths.is_empty() || damage.iter().any(|event| event.defender_side == Side::Own);

        if !learning_event {
            let mut idle: Vec<UnitId> = Vec::new();
            for report in history.action_feedback(Side::Own, last) {
                let unit = report.command.unit;
                if report.outcome == ActionOutcome::Completed
                    && own.contains(&unit)
                    && !idle.contains(&unit)
                {
                    idle.push(unit);
                }
            }
            let commands = self.issue_actions(state, world, &idle, sink)?;
            return Ok(TickReport {
                turn,
                learning_event,
                reward: None,
                updates: 0,
                commands,
            });
        }

        let rewarded = match self.config.reward_scope {
            RewardScope::Survivors => &own,
            RewardScope::PreviousRoster => &previous_own,
        };
        let reward: f64 = rewarded
            .iter()
            .map(|&unit| unit_reward(unit, &damage, &deaths, &self.config.rewards))
            .sum();
        state.ledger.record(reward);

        let mut updates = 0;
        if state.phase().is_learning() {
            for &unit in &own {
                let Some(old_features) = state.pending.remove(&unit) else {
                    debug!(unit = %unit, "no pending features; skipping update");
                    continue;
                };
                let ctx = FeatureContext::new(world, &state.in_flight, state.roster.enemies());
                let next_max_q = state.q.max_q(&self.extractor, &ctx, unit)?;
                state.q.update(&old_features, reward, next_max_q)?;
                updates += 1;
            }
        }

        debug!(turn, reward, updates, "learning event");

        let commands = self.issue_actions(state, world, &own, sink)?;

        let episode = state.current_episode();
        self.notify("learning_event", |observer| {
            observer.on_learning_event(episode, turn, reward)
        });
        Ok(TickReport {
            turn,
            learning_event,
            reward: Some(reward),
            updates,
            commands,
        })
    }

    /// Give each of `units` a new target and remember the features used.
    fn issue_actions(
        &mut self,
        state: &mut TrainingState,
        world: &dyn WorldSnapshot,
        units: &[UnitId],
        sink: &mut dyn ActionSink,
    ) -> Result<usize> {
        let mut issued = 0;
        for &unit in units {
            let ctx = FeatureContext::new(world, &state.in_flight, state.roster.enemies());
            match self
                .policy
                .select(&self.extractor, &ctx, &state.q, unit, &mut self.rng)
            {
                Ok(selection) => {
                    sink.issue(AttackCommand::new(unit, selection.target));
                    state.pending.insert(unit, selection.features);
                    issued += 1;
                }
                Err(Error::NoLiveEnemies { .. }) => {
                    debug!(unit = %unit, "no live enemies; no action issued");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(issued)
    }

    /// Close an episode: record its reward, evaluate, persist, and advance
    /// the phase schedule.
    pub fn on_episode_end(
        &mut self,
        state: &mut TrainingState,
        world: &dyn WorldSnapshot,
    ) -> Result<EpisodeSummary> {
        let episode = state.current_episode();
        let phase = state.phase();
        let reward = state.ledger.total();
        state.episode_rewards.push(reward);

        let won = world.live_count(Side::Own) > world.live_count(Side::Enemy);
        if won {
            state.episodes_won += 1;
        }

        let mut evaluation = None;
        if phase == EpisodePhase::Evaluating {
            state.evaluation_window.push(reward);
            if state.evaluation_window.len() >= self.config.schedule.evaluation_episodes {
                evaluation = Some(self.close_evaluation_window(state));
            }
        }

        if let Err(err) = self.store.save(state.q.weights()) {
            warn!(error = %err, "failed to save weights; continuing with in-memory weights");
        }

        if let Some(next) = state.phase.complete_episode(&self.config.schedule) {
            info!(episode, next = next.label(), "phase transition");
        }

        let summary = EpisodeSummary {
            episode,
            phase,
            reward,
            learning_events: state.ledger.len(),
            won,
        };
        if let Some(report) = &evaluation {
            self.notify("evaluation_report", |observer| {
                observer.on_evaluation_report(report)
            });
        }
        self.notify("episode_end", |observer| observer.on_episode_end(&summary));
        Ok(summary)
    }

    fn close_evaluation_window(&mut self, state: &mut TrainingState) -> EvaluationReport {
        let window = std::mem::take(&mut state.evaluation_window);
        let average = window.iter().sum::<f64>() / window.len() as f64;
        state.average_rewards.push(average);

        let new_best = average > state.best.average;
        if new_best {
            state.best = BestWeightsRecord {
                average,
                weights: Some(state.q.weights().clone()),
            };
            info!(average, "new best evaluation average");
            if let Err(err) = self.store.save_best(state.q.weights()) {
                warn!(error = %err, "failed to save best weights");
            }
        }

        EvaluationReport {
            averages: state.average_rewards.clone(),
            games_per_row: self.config.schedule.testing_episodes,
            weights: state.q.weights().clone(),
            new_best,
        }
    }

    /// Final report payload for the run so far.
    pub fn finish(&self, state: &TrainingState) -> RunSummary {
        RunSummary {
            episode_rewards: state.episode_rewards.clone(),
            episodes_won: state.episodes_won,
            average_rewards: state.average_rewards.clone(),
            best_average: state.best.weights.as_ref().map(|_| state.best.average),
            final_weights: state.q.weights().clone(),
        }
    }
}
