//! Dependency injection container for the controller.
//!
//! The container owns the weight store and hands out training loops wired
//! to it.

use std::sync::Arc;

use super::config::ControllerConfig;
use crate::{
    Result, adapters::TextWeightStore, pipeline::TrainingLoop, ports::WeightStore,
};

/// Shared, thread-safe weight store handle.
pub type SharedWeightStore = Arc<dyn WeightStore + Send + Sync>;

/// Application with dependency injection.
///
/// # Examples
///
/// ```
/// use skirmish::adapters::InMemoryWeightStore;
/// use skirmish::app::{App, ControllerConfig};
///
/// let app = App::builder()
///     .with_store(InMemoryWeightStore::new())
///     .with_default_seed(42)
///     .build();
///
/// let mut controller = app.create_controller(ControllerConfig::default())?;
/// let state = controller.initial_state();
/// assert_eq!(state.weights().len(), 6);
/// # Ok::<(), skirmish::Error>(())
/// ```
pub struct App {
    weight_store: SharedWeightStore,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults: text weight files under
    /// `agent_weights/` and no default seed.
    pub fn new() -> Self {
        Self {
            weight_store: Arc::new(TextWeightStore::default()),
            default_seed: None,
        }
    }

    /// Create a builder for an app with custom dependencies.
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn weight_store(&self) -> SharedWeightStore {
        Arc::clone(&self.weight_store)
    }

    /// Create a training loop sharing this app's weight store.
    ///
    /// A seed in `config` takes precedence over the app default.
    pub fn create_controller(
        &self,
        mut config: ControllerConfig,
    ) -> Result<TrainingLoop<SharedWeightStore>> {
        config.seed = config.seed.or(self.default_seed);
        TrainingLoop::seeded(config, self.weight_store())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
pub struct AppBuilder {
    weight_store: Option<SharedWeightStore>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            weight_store: None,
            default_seed: None,
        }
    }

    /// Set a custom weight store.
    pub fn with_store<S: WeightStore + Send + Sync + 'static>(mut self, store: S) -> Self {
        self.weight_store = Some(Arc::new(store));
        self
    }

    /// Set a default random seed for every controller created.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app. Falls back to `TextWeightStore` when no store was set.
    pub fn build(self) -> App {
        App {
            weight_store: self
                .weight_store
                .unwrap_or_else(|| Arc::new(TextWeightStore::default())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryWeightStore, app::Pretrained, q_learning::WeightVector};

    #[test]
    fn test_default_seed_makes_runs_reproducible() {
        let app = App::builder()
            .with_store(InMemoryWeightStore::new())
            .with_default_seed(42)
            .build();

        let a = app
            .create_controller(ControllerConfig::default())
            .unwrap()
            .initial_state();
        let b = app
            .create_controller(ControllerConfig::default())
            .unwrap()
            .initial_state();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn test_controller_shares_app_store() {
        let app = App::builder()
            .with_store(InMemoryWeightStore::new())
            .build();
        let stored = WeightVector::new(vec![0.5; 6]);
        app.weight_store().save(&stored).unwrap();

        let config = ControllerConfig::default().with_pretrained(Pretrained::Latest);
        let state = app.create_controller(config).unwrap().initial_state();
        assert_eq!(state.weights(), &stored);
    }
}
