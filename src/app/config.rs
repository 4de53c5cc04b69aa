//! Configuration types for controller creation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::{
        rewards::{RewardConfig, RewardScope},
        schedule::PhaseSchedule,
    },
    q_learning::{EpsilonGreedy, FeatureExtractor},
};

/// Default learning rate (alpha).
pub const DEFAULT_LEARNING_RATE: f64 = 0.0001;
/// Default discount factor (gamma).
pub const DEFAULT_DISCOUNT: f64 = 0.9;
/// Unit kind the controller commands by default.
pub const DEFAULT_SQUAD_KIND: &str = "footman";

/// Which stored weights, if any, seed a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pretrained {
    /// Start from uniform random weights
    #[default]
    None,
    /// Resume from the latest saved weights
    Latest,
    /// Resume from the best weights recorded
    Best,
}

impl Pretrained {
    pub fn label(&self) -> &'static str {
        match self {
            Pretrained::None => "none",
            Pretrained::Latest => "latest",
            Pretrained::Best => "best",
        }
    }
}

/// Configuration for creating a training loop.
///
/// Builder-style, with defaults matching the reference constants.
///
/// # Examples
///
/// ```
/// use skirmish::app::{ControllerConfig, Pretrained};
///
/// let config = ControllerConfig::default()
///     .with_seed(42)
///     .with_epsilon(0.05)
///     .with_pretrained(Pretrained::Best);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub learning_rate: f64,
    pub discount: f64,
    /// Exploration probability
    pub epsilon: f64,
    /// Value of the constant feature
    pub feature_bias: f64,
    pub schedule: PhaseSchedule,
    pub rewards: RewardConfig,
    pub reward_scope: RewardScope,
    /// Unit kind that makes up both rosters
    pub squad_kind: String,
    pub pretrained: Pretrained,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Episode budget for a run
    pub episodes: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount: DEFAULT_DISCOUNT,
            epsilon: EpsilonGreedy::DEFAULT_EPSILON,
            feature_bias: FeatureExtractor::DEFAULT_BIAS,
            schedule: PhaseSchedule::default(),
            rewards: RewardConfig::default(),
            reward_scope: RewardScope::default(),
            squad_kind: DEFAULT_SQUAD_KIND.to_string(),
            pretrained: Pretrained::default(),
            seed: None,
            episodes: 10,
        }
    }
}

impl ControllerConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_feature_bias(mut self, bias: f64) -> Self {
        self.feature_bias = bias;
        self
    }

    pub fn with_schedule(mut self, schedule: PhaseSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_reward_scope(mut self, scope: RewardScope) -> Self {
        self.reward_scope = scope;
        self
    }

    pub fn with_squad_kind(mut self, kind: impl Into<String>) -> Self {
        self.squad_kind = kind.into();
        self
    }

    pub fn with_pretrained(mut self, pretrained: Pretrained) -> Self {
        self.pretrained = pretrained;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    /// Check ranges and non-empty settings.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(0.0..=1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return invalid(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return invalid(format!("discount must be in [0, 1], got {}", self.discount));
        }
        if !self.feature_bias.is_finite() {
            return invalid(format!("feature bias must be finite, got {}", self.feature_bias));
        }
        if self.schedule.testing_episodes == 0 || self.schedule.evaluation_episodes == 0 {
            return invalid("phase lengths must be at least one episode".to_string());
        }
        if self.squad_kind.trim().is_empty() {
            return invalid("squad kind must not be empty".to_string());
        }
        Ok(())
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.learning_rate, 0.0001);
        assert_eq!(config.discount, 0.9);
        assert_eq!(config.epsilon, 0.02);
        assert_eq!(config.squad_kind, "footman");
        assert_eq!(config.schedule, PhaseSchedule::new(10, 5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_epsilon() {
        let config = ControllerConfig::default().with_epsilon(-0.1);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_phase() {
        let config = ControllerConfig::default().with_schedule(PhaseSchedule::new(0, 5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "epsilon": 0.1, "pretrained": "best" }"#).unwrap();

        let config = ControllerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.pretrained, Pretrained::Best);
        assert_eq!(config.discount, 0.9);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ControllerConfig::from_json_file("/nonexistent/config.json");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
